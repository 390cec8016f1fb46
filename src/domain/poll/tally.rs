//! Poll Context - 计票

use serde::Serialize;
use std::collections::HashMap;

use super::{OptionId, PollOption};

/// 单个选项的计票结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    pub option_id: OptionId,
    pub label: String,
    pub votes: u64,
    /// 百分比，保留两位小数
    pub percentage: f64,
}

/// 投票的计票结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub entries: Vec<TallyEntry>,
    pub total_votes: u64,
    /// 得票最多的选项（并列时全部列出，无票时为空）
    pub leaders: Vec<OptionId>,
}

impl Tally {
    /// 由按选项分组的票数计算结果
    ///
    /// `counts` 中不属于 `options` 的条目被忽略；没有票的选项计为 0。
    pub fn compute(options: &[PollOption], counts: &HashMap<OptionId, u64>) -> Self {
        let raw: Vec<(&PollOption, u64)> = options
            .iter()
            .map(|o| (o, counts.get(&o.id()).copied().unwrap_or(0)))
            .collect();

        let total_votes: u64 = raw.iter().map(|(_, v)| v).sum();
        let max = raw.iter().map(|(_, v)| *v).max().unwrap_or(0);

        let leaders = if max == 0 {
            Vec::new()
        } else {
            raw.iter()
                .filter(|(_, v)| *v == max)
                .map(|(o, _)| o.id())
                .collect()
        };

        let entries = raw
            .into_iter()
            .map(|(o, votes)| TallyEntry {
                option_id: o.id(),
                label: o.label().to_string(),
                votes,
                percentage: percentage(votes, total_votes),
            })
            .collect();

        Self {
            entries,
            total_votes,
            leaders,
        }
    }
}

fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (votes as f64 * 10_000.0 / total as f64).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::OptionLabel;

    fn opts(labels: &[&str]) -> Vec<PollOption> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| PollOption::new(OptionLabel::new(*l).unwrap(), None, None, i))
            .collect()
    }

    #[test]
    fn test_empty_tally_has_no_leaders() {
        let options = opts(&["甲", "乙"]);
        let tally = Tally::compute(&options, &HashMap::new());

        assert_eq!(tally.total_votes, 0);
        assert!(tally.leaders.is_empty());
        assert!(tally.entries.iter().all(|e| e.votes == 0 && e.percentage == 0.0));
    }

    #[test]
    fn test_percentages_are_rounded_to_two_decimals() {
        let options = opts(&["甲", "乙", "丙"]);
        let counts = HashMap::from([
            (options[0].id(), 1),
            (options[1].id(), 1),
            (options[2].id(), 1),
        ]);
        let tally = Tally::compute(&options, &counts);

        assert_eq!(tally.total_votes, 3);
        assert_eq!(tally.entries[0].percentage, 33.33);
        assert_eq!(tally.leaders.len(), 3);
    }

    #[test]
    fn test_single_leader_and_unknown_counts_ignored() {
        let options = opts(&["甲", "乙"]);
        let counts = HashMap::from([
            (options[0].id(), 3),
            (options[1].id(), 1),
            (OptionId::new(), 50),
        ]);
        let tally = Tally::compute(&options, &counts);

        assert_eq!(tally.total_votes, 4);
        assert_eq!(tally.leaders, vec![options[0].id()]);
        assert_eq!(tally.entries[0].percentage, 75.0);
        assert_eq!(tally.entries[1].percentage, 25.0);
    }
}
