//! `zynqgen ports`: parse a port declaration file and list what it declares.

use std::path::Path;

use anyhow::{bail, Context, Result};
use zynq_ports::{load_port_file, PortDescriptor, PortSet};

pub fn run(file: &Path, prefix: Option<&str>, format: Option<&str>) -> Result<()> {
    let ports = load_port_file(file).with_context(|| format!("reading {}", file.display()))?;
    let text = match format {
        None | Some("text") => render_text(&ports, prefix),
        Some("json") => render_json(&ports, prefix)?,
        Some(other) => bail!("unknown format '{other}' (expected text or json)"),
    };
    print!("{text}");
    Ok(())
}

fn selected<'a>(ports: &'a PortSet, prefix: Option<&'a str>) -> Vec<&'a PortDescriptor> {
    match prefix {
        Some(prefix) => ports.with_prefix(prefix).collect(),
        None => ports.iter().collect(),
    }
}

fn render_text(ports: &PortSet, prefix: Option<&str>) -> String {
    let selected = selected(ports, prefix);
    let mut out = String::new();
    for port in &selected {
        out.push_str(&format!("  {port}\n"));
    }
    out.push_str(&format!(
        "{} of {} ports, digest {}\n",
        selected.len(),
        ports.len(),
        ports.digest()
    ));
    out
}

fn render_json(ports: &PortSet, prefix: Option<&str>) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&selected(ports, prefix))?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zynq_ports::{parse_ports, PortDirection};

    const PORTS: &str = "\
input wire [7:0] PLPSIRQ0,
output wire [3:0] PLCLK,
output MAXIGP2ARVALID,
input [127:0] MAXIGP2RDATA
";

    #[test]
    fn text_lists_ports_and_digest() {
        let ports = parse_ports(PORTS).unwrap();
        let text = render_text(&ports, None);
        assert!(text.contains("input [7:0] PLPSIRQ0"));
        assert!(text.ends_with(&format!("4 of 4 ports, digest {}\n", ports.digest())));
    }

    #[test]
    fn prefix_filters() {
        let ports = parse_ports(PORTS).unwrap();
        let text = render_text(&ports, Some("MAXIGP2"));
        assert!(!text.contains("PLCLK"));
        assert!(text.contains("2 of 4 ports"));
    }

    #[test]
    fn json_round_trips() {
        let ports = parse_ports(PORTS).unwrap();
        let json = render_json(&ports, Some("PL")).unwrap();
        let back: Vec<PortDescriptor> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].direction, PortDirection::Output);
        assert_eq!(back[1].width, 4);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("ps8.v"), None, None).unwrap_err();
        assert!(format!("{err:#}").contains("ps8.v"));
    }
}
