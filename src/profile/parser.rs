use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::info;

use super::CoverageProfile;

const NUM_COLUMNS: usize = 4;

/// Errors raised while loading a coverage profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile could not be read.
    #[error("failed to read coverage profile: {0}")]
    Io(#[from] io::Error),

    /// A line did not have exactly four tab-separated columns.
    #[error("line {line}: expected 4 tab-separated columns (chromosome, start, end, coverage), found {found}")]
    ColumnCount {
        /// 1-based line number.
        line: usize,
        /// Number of columns present.
        found: usize,
    },

    /// A numeric column did not hold a decimal integer.
    #[error("line {line}: {column} '{value}' is not an integer")]
    InvalidInteger {
        /// 1-based line number.
        line: usize,
        /// Column name.
        column: &'static str,
        /// Offending text.
        value: String,
    },

    /// Interval start below zero.
    #[error("line {line}: start cannot be negative ({start})")]
    NegativeStart {
        /// 1-based line number.
        line: usize,
        /// Parsed start.
        start: i64,
    },

    /// Interval end below zero.
    #[error("line {line}: end cannot be negative ({end})")]
    NegativeEnd {
        /// 1-based line number.
        line: usize,
        /// Parsed end.
        end: i64,
    },

    /// Interval end before its start.
    #[error("line {line}: end {end} cannot be < start {start}")]
    EndBeforeStart {
        /// 1-based line number.
        line: usize,
        /// Parsed start.
        start: i64,
        /// Parsed end.
        end: i64,
    },

    /// Target coverage below zero.
    #[error("line {line}: coverage cannot be negative ({coverage})")]
    NegativeCoverage {
        /// 1-based line number.
        line: usize,
        /// Parsed coverage.
        coverage: i64,
    },

    /// Interval end too large for its coverage array to be allocated.
    #[error("line {line}: end {end} is too large to allocate a coverage array")]
    IntervalTooLarge {
        /// 1-based line number.
        line: usize,
        /// Parsed end.
        end: usize,
    },
}

fn parse_field(line: usize, column: &'static str, value: &str) -> Result<i64, ProfileError> {
    value.parse::<i64>().map_err(|_| ProfileError::InvalidInteger {
        line,
        column,
        value: value.to_owned(),
    })
}

/// Validated interval from one line of the profile.
#[derive(Debug, PartialEq, Eq)]
struct ProfileInterval<'a> {
    chrom: &'a str,
    start: usize,
    end: usize,
    coverage: u32,
}

fn parse_line(line_no: usize, line: &str) -> Result<ProfileInterval<'_>, ProfileError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != NUM_COLUMNS {
        return Err(ProfileError::ColumnCount {
            line: line_no,
            found: cols.len(),
        });
    }

    let start = parse_field(line_no, "start", cols[1])?;
    let end = parse_field(line_no, "end", cols[2])?;
    let coverage = parse_field(line_no, "coverage", cols[3])?;

    if start < 0 {
        return Err(ProfileError::NegativeStart { line: line_no, start });
    }
    if end < 0 {
        return Err(ProfileError::NegativeEnd { line: line_no, end });
    }
    if end < start {
        return Err(ProfileError::EndBeforeStart {
            line: line_no,
            start,
            end,
        });
    }
    if coverage < 0 {
        return Err(ProfileError::NegativeCoverage {
            line: line_no,
            coverage,
        });
    }

    let out_of_range = |column: &'static str, value: i64| ProfileError::InvalidInteger {
        line: line_no,
        column,
        value: value.to_string(),
    };

    Ok(ProfileInterval {
        chrom: cols[0],
        start: usize::try_from(start).map_err(|_| out_of_range("start", start))?,
        end: usize::try_from(end).map_err(|_| out_of_range("end", end))?,
        coverage: u32::try_from(coverage).map_err(|_| out_of_range("coverage", coverage))?,
    })
}

impl CoverageProfile {
    /// Load a profile from `chromosome<TAB>start<TAB>end<TAB>coverage` lines.
    ///
    /// The first invalid line aborts loading; no partial profile is returned.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ProfileError> {
        let mut profile = CoverageProfile::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let interval = parse_line(line_no, &line)?;
            profile
                .insert(
                    interval.chrom,
                    interval.start,
                    interval.end,
                    interval.coverage,
                )
                .map_err(|err| ProfileError::IntervalTooLarge {
                    line: line_no,
                    end: err.end,
                })?;
        }
        Ok(profile)
    }

    /// Load a profile from a file, standard input (`-` or `stdin`), or a
    /// gzip-compressed file ending in `.gz`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let profile = if path == Path::new("-") || path == Path::new("stdin") {
            Self::from_reader(io::stdin().lock())?
        } else {
            let file = File::open(path)?;
            if path.extension().is_some_and(|ext| ext == "gz") {
                Self::from_reader(BufReader::new(MultiGzDecoder::new(file)))?
            } else {
                Self::from_reader(BufReader::new(file))?
            }
        };

        info!(
            path = %path.display(),
            chromosomes = profile.num_chromosomes(),
            intervals = profile.num_intervals(),
            "loaded coverage profile"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_line() {
        let interval = parse_line(1, "chr2\t5\t10\t30").expect("valid line");
        assert_eq!(
            interval,
            ProfileInterval {
                chrom: "chr2",
                start: 5,
                end: 10,
                coverage: 30,
            }
        );
    }

    #[test]
    fn reports_line_number_of_first_failure() {
        let input = "chr1\t0\t10\t5\nchr1\t10\t5\t5\nchr1\t-1\t5\t5\n";
        let err = CoverageProfile::from_reader(input.as_bytes()).unwrap_err();
        match err {
            ProfileError::EndBeforeStart { line, start, end } => {
                assert_eq!((line, start, end), (2, 10, 5));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_gives_empty_profile() {
        let profile = CoverageProfile::from_reader(&b""[..]).unwrap();
        assert_eq!(profile.num_chromosomes(), 0);
    }
}
