use std::collections::HashMap;

use serde::Serialize;

use crate::leetcode::{Difficulty, ProblemMetadata, Submission};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyTally {
    pub attempted: u32,
    pub solved: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub easy: DifficultyTally,
    pub medium: DifficultyTally,
    pub hard: DifficultyTally,
}

impl DifficultyBreakdown {
    fn tally_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyTally {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Per-topic counters for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub slug: String,
    pub name: String,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    pub failed_attempts: u32,
    pub success_rate: u32,
    /// Distinct problem ids, first-seen order.
    pub problems: Vec<String>,
    pub most_recent_timestamp: i64,
    pub difficulty: DifficultyBreakdown,
}

impl TopicRecord {
    fn new(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            total_attempts: 0,
            successful_attempts: 0,
            failed_attempts: 0,
            success_rate: 0,
            problems: Vec::new(),
            most_recent_timestamp: i64::MIN,
            difficulty: DifficultyBreakdown::default(),
        }
    }

    fn record(&mut self, submission: &Submission, difficulty: Option<Difficulty>) {
        let accepted = submission.is_accepted();
        self.total_attempts += 1;
        if accepted {
            self.successful_attempts += 1;
        }
        self.failed_attempts = self.total_attempts - self.successful_attempts;
        self.success_rate = super::percent(
            u64::from(self.successful_attempts),
            u64::from(self.total_attempts),
        );

        if !self.problems.contains(&submission.problem_id) {
            self.problems.push(submission.problem_id.clone());
        }
        self.most_recent_timestamp = self.most_recent_timestamp.max(submission.timestamp);

        if let Some(difficulty) = difficulty {
            let tally = self.difficulty.tally_mut(difficulty);
            tally.attempted += 1;
            if accepted {
                tally.solved += 1;
            }
        }
    }
}

/// Topic records keyed by topic slug, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicTable {
    records: Vec<TopicRecord>,
    index: HashMap<String, usize>,
    unmatched_submissions: usize,
}

impl TopicTable {
    pub fn get(&self, slug: &str) -> Option<&TopicRecord> {
        self.index.get(slug).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TopicRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TopicRecord> {
        self.records
    }

    /// Submissions whose problem had no metadata and fed no topic.
    pub fn unmatched_submissions(&self) -> usize {
        self.unmatched_submissions
    }

    fn entry(&mut self, tag_slug: &str, tag_name: &str) -> &mut TopicRecord {
        let next = self.records.len();
        let i = *self.index.entry(tag_slug.to_string()).or_insert(next);
        if i == next {
            self.records.push(TopicRecord::new(tag_slug, tag_name));
        }
        &mut self.records[i]
    }
}

/// Joins submissions with problem metadata and groups them by topic.
///
/// A submission fans out to every tag of its problem. Submissions for
/// problems missing from `metadata` are counted as unmatched and touch no
/// topic.
pub fn aggregate(
    submissions: &[Submission],
    metadata: &HashMap<String, ProblemMetadata>,
) -> TopicTable {
    let mut table = TopicTable::default();

    for submission in submissions {
        let Some(problem) = metadata.get(&submission.problem_id) else {
            table.unmatched_submissions += 1;
            continue;
        };
        let difficulty = problem.difficulty.as_deref().and_then(Difficulty::from_label);

        for tag in &problem.topic_tags {
            table.entry(&tag.slug, &tag.name).record(submission, difficulty);
        }
    }

    table
}
