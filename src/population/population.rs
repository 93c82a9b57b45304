//! Population type
//!
//! This module provides the Population container type.

use std::ops::Index;

use crate::population::member::PopulationMember;

/// An ordered population of members
#[derive(Clone, Debug, Default)]
pub struct Population {
    /// The members of this population
    members: Vec<PopulationMember>,
    /// Current generation number
    generation: usize,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create a population from a vector of members
    pub fn from_members(members: Vec<PopulationMember>) -> Self {
        Self {
            members,
            generation: 0,
        }
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get a member by index
    pub fn get(&self, index: usize) -> Option<&PopulationMember> {
        self.members.get(index)
    }

    /// Add a member to the population
    pub fn push(&mut self, member: PopulationMember) {
        self.members.push(member);
    }

    /// Get an iterator over the members
    pub fn iter(&self) -> impl Iterator<Item = &PopulationMember> {
        self.members.iter()
    }

    /// Get the underlying slice of members
    pub fn members(&self) -> &[PopulationMember] {
        &self.members
    }

    /// Sort by score, best first
    ///
    /// The sort is stable, so equally scored members keep their relative order.
    pub fn sort_by_score(&mut self) {
        self.members.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Get the best member (first among equals)
    pub fn best(&self) -> Option<&PopulationMember> {
        self.members.iter().reduce(|best, m| {
            if m.is_better_than(best) {
                m
            } else {
                best
            }
        })
    }

    /// Scores in population order
    pub fn scores(&self) -> Vec<f64> {
        self.members.iter().map(PopulationMember::score).collect()
    }

    /// Compute mean score
    pub fn mean_score(&self) -> Option<f64> {
        if self.members.is_empty() {
            None
        } else {
            Some(self.members.iter().map(|m| m.score()).sum::<f64>() / self.len() as f64)
        }
    }

    /// Compute population diversity (average pairwise count of differing words)
    pub fn diversity(&self) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }

        let mut total_distance = 0usize;
        let mut count = 0usize;

        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                total_distance += self.members[i]
                    .text()
                    .diff_indices(self.members[j].text())
                    .len();
                count += 1;
            }
        }

        total_distance as f64 / count as f64
    }
}

impl Index<usize> for Population {
    type Output = PopulationMember;

    fn index(&self, index: usize) -> &Self::Output {
        &self.members[index]
    }
}

impl FromIterator<PopulationMember> for Population {
    fn from_iter<I: IntoIterator<Item = PopulationMember>>(iter: I) -> Self {
        Self::from_members(iter.into_iter().collect())
    }
}
