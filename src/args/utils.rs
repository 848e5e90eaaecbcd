//! Shared utilities for argument processing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use super::Args;

/// Catalog file extension, including the dot.
const CATALOG_EXT: &str = ".xcstrings";

/// What: Determine the log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides the `--log-level` argument.
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Derive the timestamped output path for `input`.
///
/// Inputs:
/// - `input`: Catalog path.
/// - `now`: Timestamp to embed.
///
/// Output:
/// - `<stem>_translated_<stamp>.xcstrings` next to `input`.
///
/// Details:
/// - `<stamp>` is RFC 3339 UTC with milliseconds, with `:` and `.` replaced by `-`,
///   e.g. `2024-05-01T10-20-30-123Z`.
/// - When `input` does not end in `.xcstrings` the suffix is appended to the full name.
#[must_use]
pub fn default_output_path(input: &Path, now: DateTime<Utc>) -> PathBuf {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(CATALOG_EXT).unwrap_or(&name);
    input.with_file_name(format!("{stem}_translated_{stamp}{CATALOG_EXT}"))
}

/// What: Resolve where the translated catalog is written.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
/// - `now`: Timestamp used for the derived name.
///
/// Output:
/// - `--output` when given, the input path under `--in-place`, otherwise
///   [`default_output_path`].
#[must_use]
pub fn output_path(args: &Args, now: DateTime<Utc>) -> PathBuf {
    if let Some(out) = &args.output {
        out.clone()
    } else if args.in_place {
        args.input.clone()
    } else {
        default_output_path(&args.input, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    /// Fixed timestamp with non-zero milliseconds.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30)
            .single()
            .expect("valid date")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    /// What: The derived name replaces the extension with a timestamped suffix.
    ///
    /// Inputs:
    /// - `dir/Localizable.xcstrings` and a name without the extension.
    ///
    /// Output:
    /// - `dir/Localizable_translated_2024-05-01T10-20-30-123Z.xcstrings`, and the suffix
    ///   appended for the other name.
    fn default_output_path_replaces_extension() {
        let out = default_output_path(Path::new("dir/Localizable.xcstrings"), fixed_now());
        assert_eq!(
            out,
            PathBuf::from("dir/Localizable_translated_2024-05-01T10-20-30-123Z.xcstrings")
        );
        let other = default_output_path(Path::new("strings.json"), fixed_now());
        assert_eq!(
            other,
            PathBuf::from("strings.json_translated_2024-05-01T10-20-30-123Z.xcstrings")
        );
    }

    #[test]
    /// What: Output precedence is `--output`, then `--in-place`, then the derived name.
    ///
    /// Inputs:
    /// - Three argument lists.
    ///
    /// Output:
    /// - The explicit path, the input path, and the derived path.
    fn output_path_precedence() {
        let explicit =
            Args::try_parse_from(["t", "-o", "out.xcstrings", "in.xcstrings"]).expect("parse");
        assert_eq!(output_path(&explicit, fixed_now()), PathBuf::from("out.xcstrings"));

        let in_place = Args::try_parse_from(["t", "--in-place", "in.xcstrings"]).expect("parse");
        assert_eq!(output_path(&in_place, fixed_now()), PathBuf::from("in.xcstrings"));

        let derived = Args::try_parse_from(["t", "in.xcstrings"]).expect("parse");
        assert_eq!(
            output_path(&derived, fixed_now()),
            PathBuf::from("in_translated_2024-05-01T10-20-30-123Z.xcstrings")
        );
    }

    #[test]
    /// What: Verbose forces debug logging.
    ///
    /// Inputs:
    /// - `--log-level warn` with and without `--verbose`.
    ///
    /// Output:
    /// - `warn`, then `debug`.
    fn verbose_overrides_log_level() {
        let quiet = Args::try_parse_from(["t", "--log-level", "warn"]).expect("parse");
        assert_eq!(determine_log_level(&quiet), "warn");
        let loud = Args::try_parse_from(["t", "--log-level", "warn", "-v"]).expect("parse");
        assert_eq!(determine_log_level(&loud), "debug");
    }
}
