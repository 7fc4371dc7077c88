use byteorder::{BigEndian, ByteOrder};

use crate::constants::{IPV4_MIN_HEADER_LEN, IPV6_HEADER_LEN};
use crate::destick::types::DestickError;

/// Total length of the datagram at the head of `wire`.
///
/// Returns `Ok(None)` while too few bytes are present to read the length
/// field.
///
/// Layout read:
///
/// ```text
/// IPv4: [ version|ihl (1) ][ tos (1) ][ total_length (2, BE) ] ...
/// IPv6: [ version|tc (1) ][ tc|flow (3) ][ payload_length (2, BE) ] ... 40-byte header
/// ```
#[inline]
pub fn datagram_len(wire: &[u8]) -> Result<Option<usize>, DestickError> {
    let first = match wire.first() {
        Some(b) => *b,
        None => return Ok(None),
    };

    match first >> 4 {
        4 => {
            if wire.len() < 4 {
                return Ok(None);
            }

            let ihl = ((first & 0x0F) as usize) * 4;
            if ihl < IPV4_MIN_HEADER_LEN {
                return Err(DestickError::Malformed(format!("ipv4 header length {}", ihl)));
            }

            let total = BigEndian::read_u16(&wire[2..4]) as usize;
            if total < ihl {
                return Err(DestickError::Malformed(format!(
                    "ipv4 total length {} shorter than header {}",
                    total, ihl
                )));
            }

            Ok(Some(total))
        }
        6 => {
            if wire.len() < 6 {
                return Ok(None);
            }

            let payload = BigEndian::read_u16(&wire[4..6]) as usize;
            Ok(Some(IPV6_HEADER_LEN + payload))
        }
        v => Err(DestickError::InvalidVersion(v)),
    }
}
