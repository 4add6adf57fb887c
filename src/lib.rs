mod macros;

pub mod btp;
pub mod cause;
pub mod codec;
pub mod context;
pub mod datatypes;
pub mod decode_as;
pub mod dissector;
pub mod grammar;
pub mod listener;
pub mod regional;
pub mod registry;
pub mod tree;


// Re-export the dispatch API for direct access
pub use codec::{DecodeError, ItsPduHeader, PerReader, PerWriter};
pub use context::DispatchContext;
pub use decode_as::{DecodeAs, DecodeAsEntry};
pub use dissector::{Dissection, Dissector, DissectorBuilder, DissectorConfig, NoRegionPolicy};
pub use registry::{Binding, DissectorTable, Parser, RegistryError};
pub use tree::{FieldNode, FieldValue, Severity};

/// Error returned by the I/O facing functions (listener, binaries).
///
/// Dispatch itself never fails; decode faults end up in the rendered tree.
/// Registration and decoding use the structured [`RegistryError`] and
/// [`DecodeError`], both of which convert into this boxed error.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for ITS I/O operations.
///
/// # Examples
///
/// ```rust
/// use its::{Dissector, FieldValue};
///
/// fn main() -> its::Result<()> {
///     let dissector = Dissector::standard()?;
///
///     // ItsPduHeader v2, messageID 2 (CAM), stationID 7, one body byte
///     let dissection = dissector.dispatch(&[0x02, 0x02, 0x00, 0x00, 0x00, 0x07, 0xFF]);
///     assert_eq!(dissection.grammar, Some("CAM"));
///     assert_eq!(
///         dissection.tree.find("stationID").unwrap().value,
///         FieldValue::Unsigned(7)
///     );
///
///     // Force CAM traffic through the SSEM grammar
///     dissector.set_decode_as(2, "SSEM")?;
///     assert_eq!(dissector.effective_binding(2).unwrap().name(), "SSEM");
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
