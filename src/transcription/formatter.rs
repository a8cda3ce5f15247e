use regex::Regex;
use std::sync::OnceLock;

/// Columns are separated by a tab or by four or more spaces. Speaker labels
/// such as `Speaker 0` contain single spaces, so plain whitespace splitting
/// would break them apart.
fn field_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\t+| {4,}").expect("valid separator pattern"))
}

struct Turn<'a> {
    speaker: &'a str,
    timestamp: &'a str,
    text: String,
}

/// Turn a vendor plain-text transcript into readable speaker turns.
///
/// Each input line is `speaker, timestamp, text`. Consecutive lines from the
/// same speaker become one paragraph headed by the first line's timestamp.
/// Parsing stops at the first line with fewer than three fields; vendor
/// transcripts end with metadata that must not leak into the output.
pub fn format_transcript(raw: &str) -> String {
    let mut turns: Vec<Turn> = Vec::new();

    for line in raw.lines() {
        let fields: Vec<&str> = field_separator()
            .split(line)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < 3 {
            break;
        }

        let text = fields[2..].join(" ");
        match turns.last_mut() {
            Some(turn) if turn.speaker == fields[0] => {
                turn.text.push(' ');
                turn.text.push_str(&text);
            }
            _ => turns.push(Turn {
                speaker: fields[0],
                timestamp: fields[1],
                text,
            }),
        }
    }

    turns
        .iter()
        .map(|t| format!("{}, {}:\n{}\n\n", t.speaker, t.timestamp, t.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_same_speaker() {
        let raw = "A\t00:00:01\tHello.\nA\t00:00:01\tWorld.\nB\t00:00:05\tHi.";
        assert_eq!(
            format_transcript(raw),
            "A, 00:00:01:\nHello. World.\n\nB, 00:00:05:\nHi.\n\n"
        );
    }

    #[test]
    fn test_stops_at_malformed_line() {
        let raw = "A\t00:00:01\tHello.\nB\t00:00:05\tHi.\nTranscribed by rev.ai\nC\t00:00:09\tLost.";
        assert_eq!(
            format_transcript(raw),
            "A, 00:00:01:\nHello.\n\nB, 00:00:05:\nHi.\n\n"
        );
    }

    #[test]
    fn test_blank_line_ends_transcript() {
        let raw = "A\t00:00:01\tHello.\n\nB\t00:00:05\tHi.";
        assert_eq!(format_transcript(raw), "A, 00:00:01:\nHello.\n\n");
    }

    #[test]
    fn test_four_space_columns() {
        let raw = "Speaker 0    00:00:00    Thanks for joining.\nSpeaker 0    00:00:04    It's a pleasure.\nSpeaker 1    00:00:07    Happy to.\n";
        assert_eq!(
            format_transcript(raw),
            "Speaker 0, 00:00:00:\nThanks for joining. It's a pleasure.\n\nSpeaker 1, 00:00:07:\nHappy to.\n\n"
        );
    }

    #[test]
    fn test_speaker_returning_starts_new_turn() {
        let raw = "A\t1\tone\nB\t2\ttwo\nA\t3\tthree";
        assert_eq!(
            format_transcript(raw),
            "A, 1:\none\n\nB, 2:\ntwo\n\nA, 3:\nthree\n\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_transcript(""), "");
        assert_eq!(format_transcript("only two\tfields"), "");
    }
}
