//! The fused tokenizer and line classifier.
//!
//! [`count_stats`] performs a single forward pass over a job's content,
//! tracking one scan state per byte and committing a classification for
//! every line. This is the CPU hot path of the whole engine; changes here
//! should be benchmarked (`benches/scanner.rs`).

use tracing::trace;

use crate::config::ScanConfig;
use crate::language::LanguageProfile;
use crate::matcher;
use crate::stats::{FileJob, HashValue, LineType};

/// NUL bytes past this offset no longer mark a file binary.
const BINARY_CHECK_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Line so far contains only whitespace.
    Blank,
    /// Line has seen at least one code byte.
    Code,
    /// Line began as a single-line comment.
    Comment,
    /// Single-line comment opened after code on the same line.
    CommentCode,
    /// Inside a multi-line comment that began on a blank-or-comment line.
    MultiComment,
    /// Inside a multi-line comment that opened after code on this line.
    MultiCommentCode,
    /// Multi-line comment just closed; rest of the line is whitespace so far.
    MultiCommentBlank,
    /// Inside a string literal.
    String,
}

const fn reset_state(state: ScanState) -> ScanState {
    match state {
        ScanState::MultiComment | ScanState::MultiCommentCode => ScanState::MultiComment,
        ScanState::String => ScanState::String,
        _ => ScanState::Blank,
    }
}

/// Per-file scan state: the current classification state, the stack of
/// pending multi-line comment closers, and the active string closer.
struct Machine<'p> {
    profile: &'p LanguageProfile,
    count_complexity: bool,
    state: ScanState,
    end_comments: Vec<&'p [u8]>,
    end_string: &'p [u8],
    complexity: u64,
}

impl<'p> Machine<'p> {
    fn new(profile: &'p LanguageProfile, config: &ScanConfig) -> Self {
        Self {
            profile,
            count_complexity: !config.complexity,
            state: ScanState::Blank,
            end_comments: Vec::new(),
            end_string: &[],
            complexity: 0,
        }
    }

    /// Advance the machine over the non-whitespace byte at `index`,
    /// returning how many extra bytes the transition consumed.
    fn step(&mut self, current: u8, index: usize, end: usize, content: &[u8]) -> usize {
        match self.state {
            ScanState::Code => self.step_code(current, index, end, content),
            ScanState::String => self.step_string(current, index, end, content),
            ScanState::MultiComment | ScanState::MultiCommentCode => {
                self.step_multi_comment(current, index, end, content)
            }
            ScanState::Blank | ScanState::MultiCommentBlank => {
                self.step_blank(current, index, end, content)
            }
            // The rest of the line is comment; nothing can change that.
            ScanState::Comment | ScanState::CommentCode => 0,
        }
    }

    fn step_code(&mut self, current: u8, index: usize, end: usize, content: &[u8]) -> usize {
        if !matcher::should_process(current, &self.profile.process_bytes) {
            return 0;
        }

        if let Some((length, close)) =
            matcher::matches_open_close(current, index, end, &self.profile.string_checks, content)
        {
            self.end_string = close;
            self.state = ScanState::String;
            return length - 1;
        }

        if matcher::matches_any(
            current,
            index,
            end,
            &self.profile.single_line_comments,
            content,
        ) {
            self.state = ScanState::CommentCode;
            return 0;
        }

        if self.end_comments.is_empty() || self.profile.nested {
            if let Some((length, close)) = matcher::matches_open_close(
                current,
                index,
                end,
                &self.profile.multi_line_comments,
                content,
            ) {
                self.end_comments.push(close);
                self.state = ScanState::MultiCommentCode;
                return length - 1;
            }
        }

        if self.count_complexity {
            let length = matcher::complexity_match(
                current,
                index,
                end,
                &self.profile.complexity_checks,
                &self.profile.complexity_bytes,
                content,
            );
            if length != 0 {
                self.complexity += 1;
                return length - 1;
            }
        }

        0
    }

    fn step_string(&mut self, current: u8, index: usize, end: usize, content: &[u8]) -> usize {
        // A string open was consumed to get here, so index is at least 1.
        // Only a literal preceding backslash counts as an escape; after a
        // doubled backslash the close is still treated as escaped.
        if content[index - 1] != b'\\'
            && matcher::matches_single(current, index, end, self.end_string, content)
        {
            self.state = ScanState::Code;
            return self.end_string.len() - 1;
        }
        0
    }

    fn step_multi_comment(
        &mut self,
        current: u8,
        index: usize,
        end: usize,
        content: &[u8],
    ) -> usize {
        // The close check must run before the reopen check, otherwise a
        // close sharing bytes with an open would push spurious nesting.
        if let Some(&closing) = self.end_comments.last() {
            if matcher::matches_single(current, index, end, closing, content) {
                let length = closing.len();
                self.end_comments.pop();
                if self.end_comments.is_empty() {
                    // A line like `i = 1 /* note */ + 2` is committed as
                    // code either way, so the code flavor drops straight
                    // back to Code rather than MultiCommentBlank.
                    self.state = if self.state == ScanState::MultiCommentCode {
                        ScanState::Code
                    } else {
                        ScanState::MultiCommentBlank
                    };
                }
                return length - 1;
            }
        }

        if self.profile.nested || self.end_comments.is_empty() {
            if let Some((length, close)) = matcher::matches_open_close(
                current,
                index,
                end,
                &self.profile.multi_line_comments,
                content,
            ) {
                self.end_comments.push(close);
                return length - 1;
            }
        }

        0
    }

    fn step_blank(&mut self, current: u8, index: usize, end: usize, content: &[u8]) -> usize {
        // From blank we can enter a multi-line comment, a single-line
        // comment, a string, or code; exactly one of them, in that order.
        // Single-line comments are checked before strings because
        // shell-style languages share leading bytes between the two.
        if self.profile.nested || self.end_comments.is_empty() {
            if let Some((length, close)) = matcher::matches_open_close(
                current,
                index,
                end,
                &self.profile.multi_line_comments,
                content,
            ) {
                self.end_comments.push(close);
                self.state = ScanState::MultiComment;
                return length - 1;
            }
        }

        if matcher::matches_any(
            current,
            index,
            end,
            &self.profile.single_line_comments,
            content,
        ) {
            self.state = ScanState::Comment;
            return 0;
        }

        if let Some((length, close)) =
            matcher::matches_open_close(current, index, end, &self.profile.string_checks, content)
        {
            self.end_string = close;
            self.state = ScanState::String;
            return length - 1;
        }

        self.state = ScanState::Code;
        if self.count_complexity {
            let length = matcher::complexity_match(
                current,
                index,
                end,
                &self.profile.complexity_checks,
                &self.profile.complexity_bytes,
                content,
            );
            if length != 0 {
                self.complexity += 1;
                return length - 1;
            }
        }

        0
    }

    /// Classify the current line and reset for the next one. Multi-line
    /// comment and string states carry across the line boundary.
    fn commit_line(&mut self) -> LineType {
        let kind = match self.state {
            ScanState::Code
            | ScanState::String
            | ScanState::CommentCode
            | ScanState::MultiCommentCode => LineType::Code,
            ScanState::Comment | ScanState::MultiComment | ScanState::MultiCommentBlank => {
                LineType::Comment
            }
            ScanState::Blank => LineType::Blank,
        };
        self.state = reset_state(self.state);
        kind
    }
}

/// Scan `job.content` and populate the job's counts, binary flag and
/// (when duplicate detection is on) content digest.
///
/// A file containing anything, even a lone newline, has at least one line;
/// an empty file has zero. Newlines belong to the line they end, so a file
/// of `"\n"` is exactly one blank line. On completion the content buffer is
/// released; it is retained if the scan aborts early (binary file or an
/// observer returning stop).
pub fn count_stats(job: &mut FileJob, profile: &LanguageProfile, config: &ScanConfig) {
    job.bytes = job.content.len() as u64;
    if job.content.is_empty() {
        job.lines = 0;
        return;
    }

    let content = std::mem::take(&mut job.content);
    let mut callback = job.callback.take();
    let end = content.len() - 1;

    let mut machine = Machine::new(profile, config);
    let mut digest = config.duplicates.then(blake3::Hasher::new);

    let mut index = 0;
    while index < content.len() {
        let current = content[index];

        if let Some(hasher) = digest.as_mut() {
            // Bytes consumed by delimiter jumps are never folded in; both
            // members of a duplicate pair skip identically, so equality of
            // the digests still holds.
            hasher.update(&[current]);
        }

        // NUL near the start of the file marks it binary, the same
        // heuristic GNU grep, git and ripgrep use.
        if index < BINARY_CHECK_LIMIT && current == 0x00 && !config.disable_check_binary {
            job.binary = true;
            job.complexity = machine.complexity;
            job.content = content;
            job.callback = callback;
            return;
        }

        if !matcher::is_whitespace(current) {
            index += machine.step(current, index, end, &content);
        }

        if content[index] == b'\n' || index >= end {
            job.lines += 1;
            let kind = machine.commit_line();
            trace!(
                location = %job.location.display(),
                line = job.lines,
                kind = ?kind,
                "line committed"
            );
            match kind {
                LineType::Code => job.code += 1,
                LineType::Comment => job.comment += 1,
                LineType::Blank => job.blank += 1,
            }
            job.complexity = machine.complexity;

            if let Some(observer) = callback.as_mut() {
                if !observer.process_line(job, job.lines, kind) {
                    job.content = content;
                    job.callback = callback;
                    return;
                }
            }
        }

        index += 1;
    }

    if let Some(hasher) = digest {
        job.hash = Some(HashValue::from(hasher.finalize()));
    }
    job.callback = callback;
    // content drops here; the buffer is no longer needed once stats exist
}
