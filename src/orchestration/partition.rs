//! Routing of input lines to partition workers.

use crate::domain::{MatchId, RawEventRecord};
use sha2::{Digest, Sha256};

/// Assigns lines to a fixed number of partitions.
///
/// Keyed routing uses SHA-256 of the routing key, so the same key lands in
/// the same partition on every run and every platform. Lines keep their
/// arrival order inside a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    partitions: usize,
}

impl Partitioner {
    pub fn new(partitions: u16) -> Self {
        Self {
            partitions: usize::from(partitions.max(1)),
        }
    }

    pub fn count(&self) -> usize {
        self.partitions
    }

    pub fn partition_for(&self, routing_key: &str) -> usize {
        let digest = Sha256::digest(routing_key.trim().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % self.partitions as u64) as usize
    }

    /// Route each line by the key `route` extracts from it.
    pub fn split_by<F>(&self, lines: Vec<String>, route: F) -> Vec<Vec<String>>
    where
        F: Fn(&str) -> String,
    {
        let mut parts = vec![Vec::new(); self.partitions];
        for line in lines {
            let idx = self.partition_for(&route(&line));
            parts[idx].push(line);
        }
        parts
    }

    /// Route match-event lines by match id, so no match is ever split.
    pub fn split_events(&self, lines: Vec<String>) -> Vec<Vec<String>> {
        self.split_by(lines, |line| {
            match_routing_key(RawEventRecord::parse_line(line).match_id_field())
        })
    }

    /// Cut lines into contiguous chunks. Concatenating the chunks in order
    /// gives back the input order, which stateless jobs rely on.
    pub fn chunk(&self, lines: Vec<String>) -> Vec<Vec<String>> {
        if lines.is_empty() {
            return vec![Vec::new()];
        }
        let size = lines.len().div_ceil(self.partitions);
        let mut parts = Vec::with_capacity(self.partitions);
        let mut rest = lines.into_iter().peekable();
        while rest.peek().is_some() {
            parts.push(rest.by_ref().take(size).collect());
        }
        parts
    }
}

/// Canonical form of a match-id field. Ids that parse route by their integer
/// value, the same value the cursor compares, so `7` and `007` stay together.
/// Anything else routes by its trimmed text.
fn match_routing_key(field: &str) -> String {
    let field = field.trim();
    match field.parse::<i64>() {
        Ok(id) => MatchId::new(id).to_string(),
        Err(_) => field.to_string(),
    }
}
