/// Convert a string to a null-terminated UTF-16 vector suitable for Windows API calls.
pub fn to_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decode the first `len` units of a UTF-16 buffer filled by a Windows API call.
pub fn from_utf16(buf: &[u16], len: usize) -> String {
    String::from_utf16_lossy(&buf[..len.min(buf.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_is_nul_terminated() {
        let wide = to_utf16(r"C:\bin\mover.py");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(from_utf16(&wide, wide.len() - 1), r"C:\bin\mover.py");
    }

    #[test]
    fn from_utf16_clamps_length() {
        let wide = to_utf16("ab");
        assert_eq!(from_utf16(&wide[..2], 10), "ab");
    }
}
