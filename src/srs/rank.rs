//! Cosmetic rank tiers derived from the learner's level.
//!
//! Tiers are checked from the highest floor down; the first floor the level
//! reaches wins. Theme strings are opaque styling hints for the front end.

use serde::Serialize;

/// Styling hints attached to a rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankTheme {
  pub border: &'static str,
  pub background: &'static str,
  pub text: &'static str,
  pub glow: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
  pub name: &'static str,
  /// Lowest level holding this rank
  pub min_level: u32,
  pub theme: RankTheme,
}

/// All ranks, highest floor first
pub const RANKS: [Rank; 8] = [
  Rank {
    name: "Radiant Platinum",
    min_level: 50,
    theme: RankTheme {
      border: "border-cyan-300",
      background: "bg-cyan-800/30",
      text: "text-cyan-200",
      glow: "shadow-[0_0_20px_theme(colors.cyan.400)]",
    },
  },
  Rank {
    name: "Platinum",
    min_level: 40,
    theme: RankTheme {
      border: "border-cyan-400",
      background: "bg-cyan-900/20",
      text: "text-cyan-300",
      glow: "shadow-lg shadow-cyan-500/50",
    },
  },
  Rank {
    name: "Polished Gold",
    min_level: 30,
    theme: RankTheme {
      border: "border-yellow-300",
      background: "bg-yellow-800/30",
      text: "text-yellow-200",
      glow: "shadow-lg shadow-yellow-400/50",
    },
  },
  Rank {
    name: "Gold",
    min_level: 20,
    theme: RankTheme {
      border: "border-yellow-400",
      background: "bg-yellow-900/20",
      text: "text-yellow-300",
      glow: "shadow-lg shadow-yellow-500/50",
    },
  },
  Rank {
    name: "Sterling Silver",
    min_level: 15,
    theme: RankTheme {
      border: "border-sky-300",
      background: "bg-sky-900/30",
      text: "text-sky-200",
      glow: "shadow-lg shadow-sky-400/50",
    },
  },
  Rank {
    name: "Silver",
    min_level: 10,
    theme: RankTheme {
      border: "border-slate-400",
      background: "bg-slate-800/20",
      text: "text-slate-300",
      glow: "shadow-lg shadow-slate-500/50",
    },
  },
  Rank {
    name: "Polished Bronze",
    min_level: 5,
    theme: RankTheme {
      border: "border-orange-500",
      background: "bg-orange-900/20",
      text: "text-orange-400",
      glow: "shadow-lg shadow-orange-600/50",
    },
  },
  Rank {
    name: "Bronze",
    min_level: 0,
    theme: RankTheme {
      border: "border-yellow-800",
      background: "bg-yellow-900/10",
      text: "text-yellow-700",
      glow: "shadow-md shadow-yellow-800/50",
    },
  },
];

/// Rank held at `level`
pub fn rank_for_level(level: u32) -> &'static Rank {
  RANKS
    .iter()
    .find(|r| level >= r.min_level)
    .unwrap_or(&RANKS[RANKS.len() - 1])
}

/// The next rank above the one held at `level`, if any
pub fn next_rank(level: u32) -> Option<&'static Rank> {
  RANKS.iter().rev().find(|r| r.min_level > level)
}
