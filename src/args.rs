//! Separates the flags this tool understands from the ones it forwards.
//!
//! clap has no "parse known args" mode, so argv is partitioned first: the
//! recognized tokens go to clap and everything else is forwarded verbatim
//! to the packaging tool, in its original order.

/// Flags that take a value (`--flag=value` or `--flag value`).
const VALUE_FLAGS: &[&str] = &["--target", "--target_arch"];

/// Flags without a value.
const SWITCHES: &[&str] = &["--dry-run", "-h", "--help", "-V", "--version"];

/// Result of [`split_known_args`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Program name followed by recognized tokens, ready for clap.
    pub known: Vec<String>,
    /// Tokens forwarded to every tool invocation.
    pub passthrough: Vec<String>,
}

/// Partition `argv` (including the program name) into recognized and
/// forwarded tokens.
///
/// A value flag consumes the following token only when that token does not
/// start with `-`; otherwise clap sees the bare flag and reports the missing
/// value. A lone `--` stops recognition and is itself dropped.
pub fn split_known_args<I, S>(argv: I) -> SplitArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut iter = argv.into_iter().map(Into::<String>::into).peekable();
    let mut split = SplitArgs::default();

    if let Some(program) = iter.next() {
        split.known.push(program);
    }

    while let Some(arg) = iter.next() {
        if arg == "--" {
            split.passthrough.extend(iter.by_ref());
            break;
        }

        let name = arg.split_once('=').map_or(arg.as_str(), |(name, _)| name);
        if VALUE_FLAGS.contains(&name) {
            let has_inline_value = name.len() < arg.len();
            split.known.push(arg);
            if !has_inline_value {
                if let Some(value) = iter.next_if(|next| !next.starts_with('-')) {
                    split.known.push(value);
                }
            }
        } else if SWITCHES.contains(&arg.as_str()) {
            split.known.push(arg);
        } else {
            split.passthrough.push(arg);
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(args: &[&str]) -> SplitArgs {
        let mut argv = vec!["prebuild-matrix"];
        argv.extend_from_slice(args);
        split_known_args(argv)
    }

    #[test]
    fn no_args_keeps_program_name() {
        let s = split(&[]);
        assert_eq!(s.known, vec!["prebuild-matrix"]);
        assert!(s.passthrough.is_empty());
    }

    #[test]
    fn inline_values_are_recognized() {
        let s = split(&["--target=8.0.0", "--target_arch=x64"]);
        assert_eq!(
            s.known,
            vec!["prebuild-matrix", "--target=8.0.0", "--target_arch=x64"]
        );
        assert!(s.passthrough.is_empty());
    }

    #[test]
    fn separate_values_are_recognized() {
        let s = split(&["--target", "all", "--target_arch", "ia32"]);
        assert_eq!(
            s.known,
            vec!["prebuild-matrix", "--target", "all", "--target_arch", "ia32"]
        );
    }

    #[test]
    fn unknown_flags_pass_through_in_order() {
        let s = split(&[
            "--debug",
            "--target=all",
            "--msvs_version=2015",
            "extra",
            "--target_arch=all",
            "-j",
        ]);
        assert_eq!(s.passthrough, vec!["--debug", "--msvs_version=2015", "extra", "-j"]);
        assert_eq!(
            s.known,
            vec!["prebuild-matrix", "--target=all", "--target_arch=all"]
        );
    }

    #[test]
    fn flag_like_token_is_not_taken_as_value() {
        let s = split(&["--target", "--debug"]);
        assert_eq!(s.known, vec!["prebuild-matrix", "--target"]);
        assert_eq!(s.passthrough, vec!["--debug"]);
    }

    #[test]
    fn prefix_lookalikes_pass_through() {
        let s = split(&["--target_platform=linux", "--targets=x"]);
        assert_eq!(s.known, vec!["prebuild-matrix"]);
        assert_eq!(s.passthrough, vec!["--target_platform=linux", "--targets=x"]);
    }

    #[test]
    fn double_dash_forwards_the_rest() {
        let s = split(&["--dry-run", "--", "--target=5.0.0", "--foo"]);
        assert_eq!(s.known, vec!["prebuild-matrix", "--dry-run"]);
        assert_eq!(s.passthrough, vec!["--target=5.0.0", "--foo"]);
    }

    #[test]
    fn switches_are_recognized() {
        let s = split(&["-h", "--version", "--dry-run"]);
        assert_eq!(s.known.len(), 4);
        assert!(s.passthrough.is_empty());
    }

    #[test]
    fn empty_inline_value_is_kept() {
        let s = split(&["--target="]);
        assert_eq!(s.known, vec!["prebuild-matrix", "--target="]);
    }
}
