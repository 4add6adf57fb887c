mod application_id;
mod cause_code;
mod message_id;
mod region;
mod sub_cause_code;
mod well_known_port;

pub use application_id::ApplicationId;
pub use cause_code::CauseCodeType;
pub use message_id::MessageId;
pub use region::{RegExtKind, RegionId, RegionKey};
pub use sub_cause_code::*;
pub use well_known_port::WellKnownPort;
