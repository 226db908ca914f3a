//! Output of `bosh ssh --command`, grouped per VM.
//!
//! The CLI prints every remote line as `<instance>: stdout | <text>` (or
//! `stderr`). Anything else it prints (task banners, "Succeeded", progress)
//! is noise and dropped here.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static TAGGED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+?):?\s+(stdout|stderr)\s+\|\s*(.*)$").expect("valid tagged line regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// One line printed by a remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLine {
    pub vm_name: String,
    pub stream: Stream,
    pub text: String,
}

impl RemoteLine {
    /// Classify one line of CLI output, `None` for untagged noise.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = TAGGED_LINE.captures(line.trim_end_matches('\r'))?;
        let stream = match &caps[2] {
            "stdout" => Stream::Stdout,
            _ => Stream::Stderr,
        };
        Some(Self {
            vm_name: caps[1].to_string(),
            stream,
            text: caps[3].trim().to_string(),
        })
    }
}

/// Lines of one stream keyed by VM, in the order the VMs first appeared.
///
/// A VM only gets an entry once a line was tagged to it, so no entry is
/// ever empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputByVm(IndexMap<String, Vec<String>>);

impl OutputByVm {
    fn push(&mut self, vm_name: String, text: String) {
        self.0.entry(vm_name).or_default().push(text);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(vm, lines)| (vm.as_str(), lines.as_slice()))
    }

    /// Every line of every VM, VM by VM in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(String::as_str)
    }
}

/// Both streams of one remote command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    pub stdout: OutputByVm,
    pub stderr: OutputByVm,
}

impl FromIterator<RemoteLine> for RemoteOutput {
    fn from_iter<I: IntoIterator<Item = RemoteLine>>(iter: I) -> Self {
        let mut output = RemoteOutput::default();
        for line in iter {
            match line.stream {
                Stream::Stdout => output.stdout.push(line.vm_name, line.text),
                Stream::Stderr => output.stderr.push(line.vm_name, line.text),
            }
        }
        output
    }
}

/// Group raw CLI output into per-VM stdout and stderr lines.
pub fn aggregate(raw: &str) -> RemoteOutput {
    raw.lines().filter_map(RemoteLine::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of<'a>(output: &'a OutputByVm, vm: &str) -> Option<Vec<&'a str>> {
        output
            .iter()
            .find(|(name, _)| *name == vm)
            .map(|(_, lines)| lines.iter().map(String::as_str).collect())
    }

    #[test]
    fn untagged_output_aggregates_to_nothing() {
        let raw = "Using environment '192.168.50.6' as client 'admin'\n\
                   Using deployment 'cf'\n\
                   Task 42 done\n\
                   \n\
                   Succeeded\n";
        let output = aggregate(raw);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn routes_lines_by_stream_and_vm() {
        let raw = "router/0a1b: stdout | hello  \n\
                   router/0a1b: stderr | Unauthorized use is strictly prohibited\n\
                   api/77ff: stdout | world\n\
                   router/0a1b: stdout | again\n";
        let output = aggregate(raw);

        assert_eq!(lines_of(&output.stdout, "router/0a1b"), Some(vec!["hello", "again"]));
        assert_eq!(lines_of(&output.stdout, "api/77ff"), Some(vec!["world"]));
        assert_eq!(output.stderr.len(), 1);
        assert_eq!(lines_of(&output.stderr, "api/77ff"), None);
    }

    #[test]
    fn keeps_vm_insertion_order_and_duplicates() {
        let raw = "b stdout | 1\na stdout | 2\nb stdout | 1\n";
        let output = aggregate(raw);
        let vms: Vec<_> = output.stdout.iter().map(|(vm, _)| vm).collect();
        assert_eq!(vms, vec!["b", "a"]);
        assert_eq!(lines_of(&output.stdout, "b"), Some(vec!["1", "1"]));
        assert_eq!(output.stdout.lines().collect::<Vec<_>>(), vec!["1", "1", "2"]);
    }

    #[test]
    fn empty_content_is_still_a_line() {
        let line = RemoteLine::parse("vm1 stdout |").expect("tagged");
        assert_eq!(line.vm_name, "vm1");
        assert_eq!(line.stream, Stream::Stdout);
        assert_eq!(line.text, "");
    }

    #[test]
    fn stream_tag_must_be_followed_by_a_pipe() {
        assert!(RemoteLine::parse("vm1 stdout hello").is_none());
        assert!(RemoteLine::parse("vm1 stdin | hello").is_none());
    }
}
