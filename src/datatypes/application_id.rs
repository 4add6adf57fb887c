// ABOUTME: ITS Application Object Identifiers that secured ITS application PDUs are signed under
// ABOUTME: Distinguishes AIDs carrying dispatchable PDUs from GeoNetworking management traffic

use num_enum::TryFromPrimitive;

/// ITS Application Object Identifiers (ITS-AID) per ETSI TS 102 965,
/// as carried in the security header of GeoNetworking packets.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApplicationId {
    Ca = 36,
    Den = 37,
    Tlm = 137,
    Rlt = 138,
    Ivi = 139,
    Tlc = 140,
    GnMgmt = 141,
}

impl ApplicationId {
    /// Whether secured packets with this AID carry an ITS application PDU
    pub fn is_dissected(&self) -> bool {
        !matches!(self, ApplicationId::GnMgmt)
    }
}
