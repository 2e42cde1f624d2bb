//! Records read from and written to the symptom checker's flat files.

pub mod illness;
pub mod symptom;
pub mod user;

pub use illness::{IllnessLevel, IllnessRecord, IllnessSample};
pub use symptom::Symptom;
pub use user::{NewUser, User, UserProfile};
