//! Caller side of the waitlist: the HTTP binding, the signup form state
//! machine and the live count display.

pub mod api;
pub mod counter;
pub mod form;

pub use api::{ClientError, HttpWaitlistClient, WaitlistApi};
pub use counter::{poll_count, CountUp, ANIMATION_DURATION, POLL_INTERVAL};
pub use form::{FormState, Notice, SignupForm, SubmitBlocked};
