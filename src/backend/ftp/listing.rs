//! Directory listing for the FTP backend: `MLSD` first, `NLST` + `CWD` probes
//! when the server has no machine-readable listing.

use super::session::FtpSession;
use crate::backend::path::is_navigation_entry;
use crate::error::FsError;

/// Entry kind taken from an MLSD `type=` fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlsdKind {
    Dir,
    File,
    /// `cdir`, `pdir`, `os.unix=slink:...` and anything else.
    Other,
}

/// Parse one MLSD line into `(name, kind)`.
///
/// The line is split on `;`: the last field, trimmed, is the name, and the
/// preceding fields are facts. A line without a `type=` fact is a file.
pub fn parse_mlsd_line(line: &str) -> Option<(String, MlsdKind)> {
    let mut fields: Vec<&str> = line.split(';').collect();
    let name = fields.pop()?.trim();
    if name.is_empty() || is_navigation_entry(name) {
        return None;
    }

    let kind = fields
        .iter()
        .map(|fact| fact.trim())
        .find_map(|fact| {
            let (key, value) = fact.split_once('=')?;
            key.eq_ignore_ascii_case("type").then(|| value.to_ascii_lowercase())
        })
        .map_or(MlsdKind::File, |value| match value.as_str() {
            "dir" => MlsdKind::Dir,
            "file" => MlsdKind::File,
            _ => MlsdKind::Other,
        });

    Some((name.to_string(), kind))
}

/// List the session's working directory into `(dirnames, filenames)`.
pub fn list_current_dir(session: &mut dyn FtpSession) -> Result<(Vec<String>, Vec<String>), FsError> {
    match session.mlsd() {
        Ok(lines) => Ok(split_mlsd(&lines)),
        Err(e) => {
            tracing::debug!("MLSD unavailable, falling back to NLST: {}", e);
            list_with_probes(session)
        }
    }
}

fn split_mlsd(lines: &[String]) -> (Vec<String>, Vec<String>) {
    let mut dirnames = Vec::new();
    let mut filenames = Vec::new();
    for (name, kind) in lines.iter().filter_map(|l| parse_mlsd_line(l)) {
        match kind {
            MlsdKind::Dir => dirnames.push(name),
            MlsdKind::File => filenames.push(name),
            MlsdKind::Other => {}
        }
    }
    (dirnames, filenames)
}

/// NLST fallback: one `CWD name` probe per entry.
///
/// After a successful probe the session returns to the listed directory by
/// its absolute path, or by `..` when `PWD` is unavailable. An entry whose
/// return trip fails is reported as a file and the listing continues.
fn list_with_probes(session: &mut dyn FtpSession) -> Result<(Vec<String>, Vec<String>), FsError> {
    let names = session.nlst()?;
    let listed_dir = match session.pwd() {
        Ok(dir) => Some(dir),
        Err(e) => {
            tracing::debug!("PWD unavailable, probing with CWD ..: {}", e);
            None
        }
    };
    let back = listed_dir.as_deref().unwrap_or("..");

    let mut dirnames = Vec::new();
    let mut filenames = Vec::new();

    for name in names {
        // Some servers answer NLST with paths rather than bare names.
        let name = match name.trim_end_matches('/').rsplit('/').next() {
            Some(base) if !base.is_empty() => base.to_string(),
            _ => continue,
        };
        if is_navigation_entry(&name) {
            continue;
        }
        if session.cwd(&name).is_err() {
            filenames.push(name);
            continue;
        }
        match session.cwd(back) {
            Ok(()) => dirnames.push(name),
            Err(e) => {
                tracing::warn!("Could not return to {} after probing {}: {}", back, name, e);
                filenames.push(name);
            }
        }
    }

    Ok((dirnames, filenames))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dir_and_file_facts() {
        assert_eq!(
            parse_mlsd_line("type=dir;modify=20240101000000;perm=flcdmpe; Season 1"),
            Some(("Season 1".to_string(), MlsdKind::Dir))
        );
        assert_eq!(
            parse_mlsd_line("type=file;size=1048576;modify=20240101000000; ABC-123.mp4"),
            Some(("ABC-123.mp4".to_string(), MlsdKind::File))
        );
    }

    #[test]
    fn type_fact_is_case_insensitive() {
        assert_eq!(
            parse_mlsd_line("Type=DIR;Perm=el; Extras").map(|(_, k)| k),
            Some(MlsdKind::Dir)
        );
        assert_eq!(
            parse_mlsd_line("size=3;TYPE=File; a.nfo").map(|(_, k)| k),
            Some(MlsdKind::File)
        );
    }

    #[test]
    fn navigation_and_other_types() {
        assert_eq!(parse_mlsd_line("type=cdir;perm=el; ."), None);
        assert_eq!(parse_mlsd_line("type=pdir;perm=el; .."), None);
        assert_eq!(
            parse_mlsd_line("type=OS.unix=slink:/target; link").map(|(_, k)| k),
            Some(MlsdKind::Other)
        );
    }

    #[test]
    fn missing_type_fact_defaults_to_file() {
        assert_eq!(
            parse_mlsd_line("size=10; plain.txt"),
            Some(("plain.txt".to_string(), MlsdKind::File))
        );
        assert_eq!(
            parse_mlsd_line("bare-name"),
            Some(("bare-name".to_string(), MlsdKind::File))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_mlsd_line(""), None);
        assert_eq!(parse_mlsd_line("type=file;  "), None);
    }

    #[test]
    fn split_keeps_listing_order() {
        let lines: Vec<String> = [
            "type=cdir; .",
            "type=file;size=1; z.mp4",
            "type=dir; b",
            "type=file;size=2; a.mp4",
            "type=dir; a",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let (dirs, files) = split_mlsd(&lines);
        assert_eq!(dirs, vec!["b", "a"]);
        assert_eq!(files, vec!["z.mp4", "a.mp4"]);
    }
}
