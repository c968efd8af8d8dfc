use std::fmt::Write as _;

use super::output::HEADER_LINE;

/// Builds a simulator reply with the header and data rows at their expected
/// line offsets, preceded by ignored preamble lines.
pub(crate) fn reply(header: &str, data: &str) -> String {
    let mut text = String::new();
    for n in 0..HEADER_LINE {
        writeln!(text, "preamble {n}").unwrap();
    }
    writeln!(text, "{header}").unwrap();
    writeln!(text, "{data}").unwrap();
    text
}

/// Writes an executable shell script standing in for the simulator.
#[cfg(unix)]
pub(crate) fn fake_simulator(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-qprop");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();

    path
}
