//! Parser for `monit status` output.
//!
//! ```text
//! The Monit daemon 5.2.5 uptime: 3h 17m
//!
//! Process 'garden'
//!   status                            running
//!   monitoring status                 monitored
//!   pid                               4242
//!   memory percent                    2.3%
//!   cpu percent                       1.5%
//! ```
//!
//! A line starting with `Process` opens a new block. The block's name is its
//! first single-quoted text that does not start with a blank, and blocks
//! without one (the preamble, a header with the quote missing) produce no
//! record. Metric lines may appear in any order; a repeated metric
//! overwrites the earlier value.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::remote_output::OutputByVm;

static PROCESS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Process(\s|$)").expect("valid process header regex"));
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^'\s][^']*)'").expect("valid quote regex"));
static CPU_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*cpu percent\s+(\d+(?:\.\d+)?)").expect("valid cpu percent regex")
});
static MEM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*memory percent\s+(\d+(?:\.\d+)?)").expect("valid memory percent regex")
});
static PID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*pid\s+(\d+)").expect("valid pid regex"));

/// One supervised process on one VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub name: String,
    pub cpu_percent: Option<String>,
    pub mem_percent: Option<String>,
    pub pid: Option<String>,
}

/// Processes per VM, VMs in the order they answered.
pub type VmProcessReport = IndexMap<String, Vec<ProcessRecord>>;

/// What a single status line contributes to the block it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine<'a> {
    ProcessHeader,
    Cpu(&'a str),
    Mem(&'a str),
    Pid(&'a str),
    Unrecognized,
}

impl<'a> StatusLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if PROCESS_HEADER.is_match(line) {
            return StatusLine::ProcessHeader;
        }
        if let Some(value) = first_capture(&CPU_LINE, line) {
            StatusLine::Cpu(value)
        } else if let Some(value) = first_capture(&MEM_LINE, line) {
            StatusLine::Mem(value)
        } else if let Some(value) = first_capture(&PID_LINE, line) {
            StatusLine::Pid(value)
        } else {
            StatusLine::Unrecognized
        }
    }
}

fn first_capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn first_quoted(line: &str) -> Option<&str> {
    first_capture(&QUOTED, line)
}

/// Fields collected for the block currently being read.
#[derive(Debug, Default)]
struct Block {
    name: Option<String>,
    cpu_percent: Option<String>,
    mem_percent: Option<String>,
    pid: Option<String>,
}

impl Block {
    fn into_record(self) -> Option<ProcessRecord> {
        Some(ProcessRecord {
            name: self.name?,
            cpu_percent: self.cpu_percent,
            mem_percent: self.mem_percent,
            pid: self.pid,
        })
    }
}

/// Parse the status lines of one VM into process records.
pub fn parse_status<S: AsRef<str>>(lines: &[S]) -> Vec<ProcessRecord> {
    let mut records = Vec::new();
    let mut block = Block::default();

    for line in lines {
        let line: &str = line.as_ref();
        let kind = StatusLine::classify(line);
        if kind == StatusLine::ProcessHeader {
            records.extend(std::mem::take(&mut block).into_record());
        }

        if block.name.is_none() {
            block.name = first_quoted(line).map(str::to_string);
        }

        match kind {
            StatusLine::Cpu(v) => block.cpu_percent = Some(v.to_string()),
            StatusLine::Mem(v) => block.mem_percent = Some(v.to_string()),
            StatusLine::Pid(v) => block.pid = Some(v.to_string()),
            StatusLine::ProcessHeader | StatusLine::Unrecognized => {}
        }
    }
    records.extend(block.into_record());

    records
}

/// Parse every VM's status output, keeping VM order.
pub fn parse_report(stdout: &OutputByVm) -> VmProcessReport {
    stdout
        .iter()
        .map(|(vm, lines)| (vm.to_string(), parse_status(lines)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn full_block_populates_every_field() {
        let records = parse_status(&lines(
            "Process 'agent'\ncpu percent 1.50\nmemory percent 2.30\npid 42",
        ));
        assert_eq!(
            records,
            vec![ProcessRecord {
                name: "agent".into(),
                cpu_percent: Some("1.50".into()),
                mem_percent: Some("2.30".into()),
                pid: Some("42".into()),
            }]
        );
    }

    #[test]
    fn missing_metric_stays_absent() {
        let records = parse_status(&lines(
            "Process 'garden'\n  status running\n  memory percent 0.0%\n  cpu percent 3.1%",
        ));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pid, None);
        assert_eq!(records[0].mem_percent.as_deref(), Some("0.0"));
        assert_eq!(records[0].cpu_percent.as_deref(), Some("3.1"));
    }

    #[test]
    fn unnamed_block_is_skipped_without_disturbing_the_next() {
        let records = parse_status(&lines(
            "The Monit daemon 5.2.5 uptime: 3h 17m\n\
             Process garden\n\
             pid 7\n\
             cpu percent 9.9\n\
             Process 'rep'\n\
             pid 8",
        ));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "rep");
        assert_eq!(records[0].pid.as_deref(), Some("8"));
        assert_eq!(records[0].cpu_percent, None);
    }

    #[test]
    fn preamble_with_a_quoted_name_counts_as_a_block() {
        let records = parse_status(&lines("Monit 'localhost'\npid 1\nProcess 'rep'"));
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["localhost", "rep"]);
        assert_eq!(records[0].pid.as_deref(), Some("1"));
    }

    #[test]
    fn empty_and_blank_quotes_are_not_names() {
        let records = parse_status(&lines("Process '' 'x'\npid 5"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "x");
        assert_eq!(records[0].pid.as_deref(), Some("5"));
    }

    #[test]
    fn last_duplicate_metric_wins() {
        let records = parse_status(&lines("Process 'x'\npid 1\npid 2\ncpu percent 1\ncpu percent 4.5"));
        assert_eq!(records[0].pid.as_deref(), Some("2"));
        assert_eq!(records[0].cpu_percent.as_deref(), Some("4.5"));
    }

    #[test]
    fn classifier_requires_line_start_for_metrics() {
        assert_eq!(StatusLine::classify("   pid 12"), StatusLine::Pid("12"));
        assert_eq!(StatusLine::classify("parent pid 12"), StatusLine::Unrecognized);
        assert_eq!(StatusLine::classify("cpu percent total 1.0%"), StatusLine::Unrecognized);
        assert_eq!(StatusLine::classify("Process 'a'"), StatusLine::ProcessHeader);
        assert_eq!(StatusLine::classify("Processes 'a'"), StatusLine::Unrecognized);
        assert_eq!(StatusLine::classify(" Process 'a'"), StatusLine::Unrecognized);
    }

    #[test]
    fn report_keeps_vm_order() {
        let output = crate::domain::remote_output::aggregate(
            "vm2 stdout | Process 'b'\nvm1 stdout | Process 'a'\nvm2 stdout | pid 3\n",
        );
        let report = parse_report(&output.stdout);
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["vm2", "vm1"]);
        assert_eq!(report["vm2"][0].pid.as_deref(), Some("3"));
        assert_eq!(report["vm1"][0].pid, None);
    }
}
