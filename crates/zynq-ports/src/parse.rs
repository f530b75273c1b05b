//! Hand-written port declaration parser.
//!
//! Reads Verilog-style declarations of the form `input [31:0] NAME` or
//! `output NAME`, one per line. Lines that do not start with a direction
//! keyword are skipped, so a whole unisim module file can be fed in as-is.

use std::path::Path;

use tracing::debug;

use crate::error::{ParseError, Result};
use crate::port::{PortDescriptor, PortDirection, PortSet};

/// Net-type keywords allowed between the direction and the range.
const NET_TYPES: &[&str] = &["wire", "reg", "logic"];

/// Load and parse a port declaration file.
pub fn load_port_file(path: &Path) -> Result<PortSet> {
    if !path.exists() {
        return Err(ParseError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    parse_ports(&text)
}

/// Parse every declaration in `text`.
///
/// A name declared twice keeps its first position but takes the later
/// width and direction.
pub fn parse_ports(text: &str) -> Result<PortSet> {
    let mut ports = PortSet::new();
    for (idx, line) in text.lines().enumerate() {
        let Some(port) = parse_declaration(line, idx + 1)? else {
            continue;
        };
        if let Some(previous) = ports.insert(port) {
            debug!(
                port = %previous.name,
                line = idx + 1,
                "redeclared port overwrites earlier declaration"
            );
        }
    }
    Ok(ports)
}

/// Parse a single line. Returns `Ok(None)` for lines that are not port
/// declarations.
pub fn parse_declaration(line: &str, line_no: usize) -> Result<Option<PortDescriptor>> {
    let mut cursor = Cursor::new(line);

    let Some(keyword) = cursor.identifier() else {
        return Ok(None);
    };
    let Some(direction) = PortDirection::from_keyword(keyword) else {
        return Ok(None);
    };

    let mut name = cursor.identifier();
    if name.is_some_and(|n| NET_TYPES.contains(&n)) {
        name = cursor.identifier();
    }

    let width = match name {
        Some(_) => 1,
        None => {
            let Some(range) = cursor.range() else {
                return Err(ParseError::MissingName {
                    line: line_no,
                    direction: keyword.to_string(),
                });
            };
            let range = range.map_err(|range| ParseError::MalformedRange {
                line: line_no,
                range: range.to_string(),
            })?;
            name = cursor.identifier();
            range_width(range, line_no)?
        }
    };

    let name = name.ok_or_else(|| ParseError::MissingName {
        line: line_no,
        direction: keyword.to_string(),
    })?;

    Ok(Some(PortDescriptor::new(name, width, direction)))
}

/// Width of a `msb:lsb` range body. An empty msb counts as bit 0.
fn range_width(range: &str, line_no: usize) -> Result<u32> {
    let (msb, lsb) = range
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedRange {
            line: line_no,
            range: range.to_string(),
        })?;
    let msb = msb.trim();
    let lsb = lsb.trim();

    let msb_value = if msb.is_empty() {
        0
    } else {
        parse_bound(msb, line_no)?
    };
    if parse_bound(lsb, line_no)? != 0 {
        return Err(ParseError::NonZeroLsb {
            line: line_no,
            range: range.to_string(),
        });
    }

    msb_value
        .checked_add(1)
        .ok_or_else(|| ParseError::InvalidWidth {
            line: line_no,
            token: msb.to_string(),
        })
}

fn parse_bound(token: &str, line_no: usize) -> Result<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidWidth {
            line: line_no,
            token: token.to_string(),
        });
    }
    token.parse().map_err(|_| ParseError::InvalidWidth {
        line: line_no,
        token: token.to_string(),
    })
}

/// Byte cursor over one line of declaration text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume an identifier run (`[A-Za-z0-9_]+`), if one starts here.
    fn identifier(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// Consume a bracketed range. `Some(Err(_))` carries the text of an
    /// unterminated range.
    fn range(&mut self) -> Option<std::result::Result<&'a str, &'a str>> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        let body = rest.strip_prefix('[')?;
        match body.find(']') {
            Some(end) => {
                self.pos += end + 2;
                Some(Ok(&body[..end]))
            }
            None => {
                self.pos = self.text.len();
                Some(Err(body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ranged_and_scalar() {
        let text = "\
input [31:0] TESTWDATA
output [3:0] TESTRID
output TESTRVALID
inout [53:0] MIO
";
        let ports = parse_ports(text).unwrap();
        assert_eq!(ports.len(), 4);
        assert_eq!(ports.get("TESTWDATA"), Some(&PortDescriptor::input("TESTWDATA", 32)));
        assert_eq!(ports.get("TESTRID"), Some(&PortDescriptor::output("TESTRID", 4)));
        assert_eq!(ports.get("TESTRVALID").unwrap().width, 1);
        assert_eq!(
            ports.get("MIO").unwrap().direction,
            PortDirection::Bidirectional
        );
    }

    #[test]
    fn skips_non_declarations() {
        let text = "\
// PS8 unisim model
module PS8 (
  output [39:0] MAXIGP0AWADDR,
  input MAXIGP0AWREADY;
  parameter SIM_DEVICE = \"ULTRASCALE_PLUS\";
endmodule
";
        let ports = parse_ports(text).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports.get("MAXIGP0AWADDR").unwrap().width, 40);
        assert!(ports.contains("MAXIGP0AWREADY"));
    }

    #[test]
    fn empty_msb_is_single_bit() {
        let ports = parse_ports("input [:0] FLAG").unwrap();
        assert_eq!(ports.get("FLAG").unwrap().width, 1);
    }

    #[test]
    fn net_type_keyword_is_skipped() {
        let ports = parse_ports("output wire [7:0] LEDS\ninput reg BTN").unwrap();
        assert_eq!(ports.get("LEDS").unwrap().width, 8);
        assert_eq!(ports.get("BTN").unwrap().width, 1);
        assert!(!ports.contains("wire"));
    }

    #[test]
    fn duplicate_declaration_last_wins() {
        let text = "input [3:0] A\noutput B\noutput [7:0] A\n";
        let ports = parse_ports(text).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports.get("A"), Some(&PortDescriptor::output("A", 8)));
        assert_eq!(ports.iter().next().unwrap().name, "A");
    }

    #[test]
    fn non_integer_width_is_error() {
        let err = parse_ports("// generated\n  output [W-1:0] DATA").unwrap_err();
        match err {
            ParseError::InvalidWidth { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "W-1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_width_is_error() {
        assert!(matches!(
            parse_ports("input [-1:0] X").unwrap_err(),
            ParseError::InvalidWidth { .. }
        ));
    }

    #[test]
    fn nonzero_lsb_is_error() {
        assert!(matches!(
            parse_ports("input [7:4] NIBBLE").unwrap_err(),
            ParseError::NonZeroLsb { .. }
        ));
    }

    #[test]
    fn unterminated_range_is_error() {
        assert!(matches!(
            parse_ports("output [7:0 BROKEN").unwrap_err(),
            ParseError::MalformedRange { .. }
        ));
        assert!(matches!(
            parse_ports("output [7] BROKEN").unwrap_err(),
            ParseError::MalformedRange { .. }
        ));
    }

    #[test]
    fn missing_name_is_error() {
        assert!(matches!(
            parse_ports("input [3:0] ;").unwrap_err(),
            ParseError::MissingName { .. }
        ));
        assert!(matches!(
            parse_ports("output").unwrap_err(),
            ParseError::MissingName { .. }
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PS8.v");
        std::fs::write(&path, "output [3:0] PLCLK\n").unwrap();
        let ports = load_port_file(&path).unwrap();
        assert_eq!(ports.get("PLCLK").unwrap().width, 4);
    }

    #[test]
    fn load_not_found() {
        let result = load_port_file(Path::new("/nonexistent/PS8.v"));
        assert!(matches!(result.unwrap_err(), ParseError::NotFound { .. }));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn declaration() -> impl Strategy<Value = String> {
            (
                prop_oneof![Just("input"), Just("output"), Just("inout")],
                proptest::option::of(0u32..512),
                "[A-Z][A-Z0-9_]{0,12}",
            )
                .prop_map(|(dir, msb, name)| match msb {
                    Some(msb) => format!("{dir} [{msb}:0] {name}"),
                    None => format!("{dir} {name}"),
                })
        }

        proptest! {
            #[test]
            fn parsing_is_idempotent(lines in proptest::collection::vec(declaration(), 0..40)) {
                let text = lines.join("\n");
                let first = parse_ports(&text).unwrap();
                let second = parse_ports(&text).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn width_is_msb_plus_one(msb in 0u32..4096) {
                let ports = parse_ports(&format!("input [{msb}:0] P")).unwrap();
                prop_assert_eq!(ports.get("P").unwrap().width, msb + 1);
            }
        }
    }
}
