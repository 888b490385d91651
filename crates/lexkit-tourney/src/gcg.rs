//! Add a tournament and round note to annotated GCG game files.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::error::TourneyError;

static ROUND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid round regex"));
static PLAYER1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.player1 (\w+)").expect("valid player regex"));

/// Round number taken from the first run of digits in a file name.
pub fn round_from_filename(name: &str) -> Result<&str, TourneyError> {
    ROUND
        .find(name)
        .map(|m| m.as_str())
        .ok_or_else(|| TourneyError::MissingRound(name.to_string()))
}

/// Insert `#note {tourney}, Round {round}.` after player 1's first move.
///
/// If that line is already followed by a `#note`, the title is prepended
/// to it. Only one note is written; the rest of the file is unchanged.
pub fn annotate_gcg(text: &str, tourney: &str, round: &str) -> String {
    let title = format!("{tourney}, Round {round}.");
    let mut out = String::with_capacity(text.len() + title.len() + 8);
    let mut player1: Option<String> = None;
    let mut note_next = false;
    let mut done = false;

    for line in text.split_inclusive('\n') {
        if done {
            out.push_str(line);
            continue;
        }
        if let Some(caps) = PLAYER1.captures(line) {
            player1 = Some(caps[1].to_string());
            out.push_str(line);
            continue;
        }
        if let Some(id) = &player1 {
            if line.contains(&format!(">{id}:")) {
                note_next = true;
                out.push_str(line);
                continue;
            }
        }
        if note_next {
            if let Some(rest) = line.strip_prefix("#note") {
                out.push_str(&format!("#note {title} {}", rest.trim_start_matches([' ', '\t'])));
            } else {
                out.push_str(&format!("#note {title}\n{line}"));
            }
            done = true;
            continue;
        }
        out.push_str(line);
    }
    out
}

/// Annotate every file in `src_dir`, writing results under the same names
/// in `dest_dir`. Returns the written paths.
pub fn annotate_directory(src_dir: &Path, dest_dir: &Path, tourney: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create directory: {}", dest_dir.display()))?;
    let mut entries: Vec<PathBuf> = std::fs::read_dir(src_dir)
        .with_context(|| format!("failed to read directory: {}", src_dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let mut written = Vec::new();
    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let round = round_from_filename(name)?;
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let dest = dest_dir.join(name);
        std::fs::write(&dest, annotate_gcg(&text, tourney, round))
            .with_context(|| format!("failed to write {}", dest.display()))?;
        tracing::debug!("annotated {} as round {round}", path.display());
        written.push(dest);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = "#character-encoding UTF-8\n\
#player1 jdoe Jane Doe\n\
#player2 rroe Rick Roe\n\
>jdoe: AEINRST 8D RETAINS +68 68\n\
>rroe: QI 9H QI +22 22\n\
>jdoe: Z 10H ZA +31 99\n";

    #[test]
    fn round_is_first_digit_run() {
        assert_eq!(round_from_filename("r12_game3.gcg").unwrap(), "12");
        assert!(round_from_filename("final.gcg").is_err());
    }

    #[test]
    fn note_inserted_after_first_move() {
        let out = annotate_gcg(GAME, "Nationals", "4");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[3], ">jdoe: AEINRST 8D RETAINS +68 68");
        assert_eq!(lines[4], "#note Nationals, Round 4.");
        assert_eq!(lines[5], ">rroe: QI 9H QI +22 22");
        assert_eq!(out.matches("#note").count(), 1);
    }

    #[test]
    fn existing_note_is_extended() {
        let game = GAME.replace(">rroe:", "#note nice bingo\n>rroe:");
        let out = annotate_gcg(&game, "Nationals", "4");
        assert!(out.contains("RETAINS +68 68\n#note Nationals, Round 4. nice bingo\n>rroe:"));
    }

    #[test]
    fn bare_note_keeps_its_line_break() {
        let out = annotate_gcg("#player1 j J\n>j: A 8D A +1 1\n#note\n>k: B\n", "T", "3");
        assert_eq!(out, "#player1 j J\n>j: A 8D A +1 1\n#note T, Round 3. \n>k: B\n");

        let crlf = annotate_gcg("#player1 j J\r\n>j: A 8D A +1 1\r\n#note\r\n>k: B\r\n", "T", "3");
        assert!(crlf.contains("#note T, Round 3. \r\n>k: B"));
    }

    #[test]
    fn file_without_player_is_unchanged() {
        let text = ">jdoe: AEINRST 8D RETAINS +68 68\n";
        assert_eq!(annotate_gcg(text, "T", "1"), text);
    }

    #[test]
    fn annotates_a_directory() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("round7.gcg"), GAME).unwrap();
        let written = annotate_directory(src.path(), dest.path(), "Open").unwrap();
        assert_eq!(written.len(), 1);
        let out = std::fs::read_to_string(dest.path().join("round7.gcg")).unwrap();
        assert!(out.contains("#note Open, Round 7.\n"));
    }
}
