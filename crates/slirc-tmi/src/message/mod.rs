//! Protocol line scanning.

mod line;
mod prefix;
mod scan;
/// IRCv3 tag utilities.
pub mod tags;

pub use self::line::LineRef;
pub use self::prefix::PrefixRef;
pub use self::tags::TagBlock;
