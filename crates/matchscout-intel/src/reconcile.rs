// Cross-season reconciliation.
//
// The stats service partitions hero statistics and match history by season,
// so a player early in a new season looks almost empty. These routines stitch
// the current and previous season into one view with current-season
// precedence.

use std::collections::HashSet;

use tracing::debug;

use crate::gateway::{fetch_as, Endpoint, StatGateway};
use crate::model::{HeroStatsResponse, MatchRecord, MatchSearchResponse, MergedHeroStats, UnifiedRecentMatches};

/// The season pair a lookup spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seasons {
    pub current: u32,
    pub previous: u32,
}

// ---------------------------------------------------------------------------
// Pure merge steps
// ---------------------------------------------------------------------------

/// Merge two seasons of hero rows keyed by hero id.
///
/// A hero present in both seasons keeps the current season's row untouched;
/// the numbers are not combined. Returns `None` only when neither season
/// produced a payload.
pub fn merge_hero_rows(
    current: Option<HeroStatsResponse>,
    previous: Option<HeroStatsResponse>,
) -> Option<MergedHeroStats> {
    if current.is_none() && previous.is_none() {
        return None;
    }

    let mut merged = MergedHeroStats::default();
    for item in current.into_iter().flat_map(|r| r.hero_stats_item_list) {
        merged.insert_if_absent(item);
    }
    for item in previous.into_iter().flat_map(|r| r.hero_stats_item_list) {
        merged.insert_if_absent(item);
    }
    Some(merged)
}

/// Concatenate current-season then previous-season matches, dropping repeated
/// ids and stopping at `target`.
pub fn assemble_matches(
    current: Vec<MatchRecord>,
    previous: Vec<MatchRecord>,
    target: usize,
) -> UnifiedRecentMatches {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unified = UnifiedRecentMatches::default();

    let tagged = current
        .into_iter()
        .map(|m| (m, true))
        .chain(previous.into_iter().map(|m| (m, false)));

    for (record, is_current) in tagged {
        if unified.matches.len() >= target {
            break;
        }
        if !record.id.is_empty() && !seen.insert(record.id.clone()) {
            continue;
        }
        if is_current {
            unified.from_current_season += 1;
        } else {
            unified.from_previous_season += 1;
        }
        unified.matches.push(record);
    }

    unified
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Fetch-and-merge front end over a gateway.
pub struct Reconciler<'a> {
    gateway: &'a dyn StatGateway,
    /// Region code for match search.
    region: u32,
    seasons: Seasons,
    cross_season: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(gateway: &'a dyn StatGateway, region: u32, seasons: Seasons, cross_season: bool) -> Self {
        Self {
            gateway,
            region,
            seasons,
            cross_season,
        }
    }

    /// Hero statistics for `tag`, merged across seasons when enabled. Both
    /// season queries run concurrently.
    pub async fn hero_stats(&self, tag: &str) -> Option<MergedHeroStats> {
        let current_ep = Endpoint::HeroStats {
            tag: tag.to_string(),
            season: self.seasons.current,
        };
        if !self.cross_season {
            let current = fetch_as::<HeroStatsResponse>(self.gateway, &current_ep).await;
            return merge_hero_rows(current, None);
        }

        let previous_ep = Endpoint::HeroStats {
            tag: tag.to_string(),
            season: self.seasons.previous,
        };
        let (current, previous) = tokio::join!(
            fetch_as::<HeroStatsResponse>(self.gateway, &current_ep),
            fetch_as::<HeroStatsResponse>(self.gateway, &previous_ep),
        );
        merge_hero_rows(current, previous)
    }

    /// Up to `target` most recent matches, backfilled from the previous
    /// season when the current one is short.
    ///
    /// The previous season is only queried when the current season returned
    /// fewer than `target` matches, and then only for the shortfall. `None`
    /// when no season had any match.
    pub async fn recent_matches(&self, tag: &str, target: usize) -> Option<UnifiedRecentMatches> {
        if target == 0 {
            return None;
        }

        let current = assemble_matches(
            self.search(tag, target, self.seasons.current).await,
            Vec::new(),
            target,
        );
        if current.len() >= target || !self.cross_season {
            return non_empty(current);
        }

        let shortfall = target - current.len();
        debug!(
            tag,
            found = current.len(),
            shortfall,
            season = self.seasons.previous,
            "backfilling matches from previous season"
        );
        let previous = self.search(tag, shortfall, self.seasons.previous).await;
        non_empty(assemble_matches(current.matches, previous, target))
    }

    /// One page of match search for a single season. Missing pages are empty.
    pub async fn search(&self, tag: &str, page_size: usize, season: u32) -> Vec<MatchRecord> {
        let endpoint = Endpoint::MatchSearch {
            tag: tag.to_string(),
            gateway: self.region,
            offset: 0,
            page_size,
            season,
        };
        fetch_as::<MatchSearchResponse>(self.gateway, &endpoint)
            .await
            .map(|r| r.matches)
            .unwrap_or_default()
    }
}

fn non_empty(unified: UnifiedRecentMatches) -> Option<UnifiedRecentMatches> {
    if unified.is_empty() {
        None
    } else {
        Some(unified)
    }
}
