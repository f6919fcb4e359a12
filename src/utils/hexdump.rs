const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Appends a hex dump of `data` to `out`, returns `false` (and writes nothing) for an empty payload.
///
/// Bytes are printed as two lowercase hex digits separated by single spaces. Command blocks
/// usually end with long runs of zeroes, so the dump stops at the first zero byte that is
/// only followed by zeroes and appends ` ..` instead.
pub fn write_pdu_dump(out: &mut String, data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }

    out.reserve(data.len() * 3);
    for (i, &byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));

        if byte == 0 && rest_is_zero(&data[i..]) {
            out.push_str(" ..");
            break;
        }
    }

    true
}

/// Hex dump of `data`, `None` when there is nothing to dump.
pub fn dump_pdu(data: &[u8]) -> Option<String> {
    let mut out = String::new();
    write_pdu_dump(&mut out, data).then_some(out)
}

fn rest_is_zero(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}
