use locscan::config::{ScanConfig, ScanConfigBuilder};
use locscan::language::LanguageProfile;
use locscan::scanner::count_stats;
use locscan::stats::FileJob;
use proptest::prelude::*;

fn scan(content: &[u8], profile: &LanguageProfile, config: &ScanConfig) -> FileJob {
    let mut job = FileJob::new("prop.src", "prop");
    job.content = content.to_vec();
    count_stats(&mut job, profile, config);
    job
}

proptest! {
    #[test]
    fn test_counts_partition_lines(content in "[ -~\t\n]{0,2000}") {
        let job = scan(content.as_bytes(), &LanguageProfile::c(), &ScanConfig::default());
        prop_assert_eq!(job.code + job.comment + job.blank, job.lines);
    }

    #[test]
    fn test_line_count_matches_newlines(content in "[ -~\t\n]{0,2000}") {
        let job = scan(content.as_bytes(), &LanguageProfile::plain(), &ScanConfig::default());
        let bytes = content.as_bytes();
        let mut expected = bytecount::count(bytes, b'\n') as u64;
        if bytes.last().is_some_and(|&b| b != b'\n') {
            expected += 1;
        }
        prop_assert_eq!(job.lines, expected);
        prop_assert_eq!(job.lines == 0, bytes.is_empty());
    }

    #[test]
    fn test_rescan_is_deterministic(content in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let config = ScanConfigBuilder::default().duplicates(true).build().unwrap();
        let first = scan(&content, &LanguageProfile::rust(), &config);
        let second = scan(&content, &LanguageProfile::rust(), &config);
        prop_assert_eq!(first.lines, second.lines);
        prop_assert_eq!(first.code, second.code);
        prop_assert_eq!(first.comment, second.comment);
        prop_assert_eq!(first.blank, second.blank);
        prop_assert_eq!(first.complexity, second.complexity);
        prop_assert_eq!(first.binary, second.binary);
        prop_assert_eq!(first.hash, second.hash);
    }

    #[test]
    fn test_empty_profile_classifies_by_whitespace_only(content in "[ -~\t\n]{0,1000}") {
        let job = scan(content.as_bytes(), &LanguageProfile::plain(), &ScanConfig::default());

        let bytes = content.as_bytes();
        let mut expected_code = 0u64;
        let mut expected_blank = 0u64;
        let mut pieces: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        if bytes.is_empty() || bytes.last() == Some(&b'\n') {
            // the split piece after a trailing newline is not a line
            pieces.pop();
        }
        for piece in pieces {
            if piece.iter().all(|&b| b == b' ' || b == b'\t' || b == b'\r') {
                expected_blank += 1;
            } else {
                expected_code += 1;
            }
        }

        prop_assert_eq!(job.code, expected_code);
        prop_assert_eq!(job.blank, expected_blank);
        prop_assert_eq!(job.comment, 0);
    }

    #[test]
    fn test_concatenation_merges_at_most_one_line(
        a in "[ -~\t\n]{0,500}",
        b in "[ -~\t\n]{0,500}",
    ) {
        let profile = LanguageProfile::plain();
        let config = ScanConfig::default();
        let lines_a = scan(a.as_bytes(), &profile, &config).lines;
        let lines_b = scan(b.as_bytes(), &profile, &config).lines;
        let combined = format!("{a}{b}");
        let lines_ab = scan(combined.as_bytes(), &profile, &config).lines;

        let merged = u64::from(!a.is_empty() && !a.ends_with('\n') && !b.is_empty());
        prop_assert_eq!(lines_ab, lines_a + lines_b - merged);
    }

    #[test]
    fn test_complexity_zero_when_skipped(content in "[ -~\t\n]{0,1000}") {
        let config = ScanConfigBuilder::default().complexity(true).build().unwrap();
        let job = scan(content.as_bytes(), &LanguageProfile::c(), &config);
        prop_assert_eq!(job.complexity, 0);
    }
}
