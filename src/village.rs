//! Per-village bookkeeping: which agents were seen, at which visits, and with which covariates.
//!
//! The order in which agents are first seen fixes their index in the village's matrices, so
//! agents are kept in an `IndexSet` rather than a hashed set.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::hashing::HashMap;

pub type VillageId = i64;
pub type VisitNumber = i64;

/// Number of leading characters of an agent id that identify the household.
pub const HOUSEHOLD_PREFIX_LEN: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    /// The household is encoded in the first seven characters of the id. Ids shorter than that
    /// are their own household.
    #[must_use]
    pub fn household(&self) -> HouseholdId {
        HouseholdId(self.0.chars().take(HOUSEHOLD_PREFIX_LEN).collect())
    }
}

impl Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        AgentId(id.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdId(pub String);

/// One observation of an agent at one visit.
///
/// Age, gender, nasal discharge and flies are kept as recorded; only the covariates used by the
/// transmission model are interpreted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Agent {
    pub id: AgentId,
    pub household: HouseholdId,
    pub infected: bool,
    pub age: String,
    pub ocular: bool,
    pub tf: bool,
    pub ti: bool,
    pub gender: String,
    pub nasal: String,
    pub flies: String,
}

#[derive(Debug)]
pub struct Village {
    id: VillageId,
    visits: BTreeMap<VisitNumber, IndexMap<AgentId, Agent>>,
    agents: IndexSet<AgentId>,
    // Earliest-visit record of each agent, with the visit it came from.
    baseline: HashMap<AgentId, (VisitNumber, Agent)>,
}

impl Village {
    #[must_use]
    pub fn new(id: VillageId) -> Self {
        Village {
            id,
            visits: BTreeMap::new(),
            agents: IndexSet::new(),
            baseline: HashMap::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> VillageId {
        self.id
    }

    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// Unique agents in the order they were first seen.
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter()
    }

    /// Row/column index of the agent in the village's matrices.
    #[must_use]
    pub fn agent_index(&self, agent: &AgentId) -> Option<usize> {
        self.agents.get_index_of(agent)
    }

    #[must_use]
    pub fn contains_agent(&self, agent: &AgentId) -> bool {
        self.agents.contains(agent)
    }

    /// The record used for the agent's covariates: its observation at the lowest-numbered visit.
    ///
    /// This is not necessarily the agent's first row in the input file. When rows are not
    /// sorted by visit, a later row from an earlier visit replaces the baseline.
    #[must_use]
    pub fn baseline(&self, agent: &AgentId) -> Option<&Agent> {
        self.baseline.get(agent).map(|(_, record)| record)
    }

    /// Visit numbers in ascending order.
    pub fn visit_numbers(&self) -> impl Iterator<Item = VisitNumber> + '_ {
        self.visits.keys().copied()
    }

    #[must_use]
    pub fn num_visits(&self) -> usize {
        self.visits.len()
    }

    #[must_use]
    pub fn visit(&self, visit: VisitNumber) -> Option<&IndexMap<AgentId, Agent>> {
        self.visits.get(&visit)
    }

    #[must_use]
    pub fn observation(&self, visit: VisitNumber, agent: &AgentId) -> Option<&Agent> {
        self.visits.get(&visit).and_then(|agents| agents.get(agent))
    }

    /// The agent's infection status at every visit in ascending visit order, `None` where the
    /// agent was not observed.
    #[must_use]
    pub fn timeline(&self, agent: &AgentId) -> Vec<Option<bool>> {
        self.visits
            .values()
            .map(|agents| agents.get(agent).map(|record| record.infected))
            .collect()
    }

    /// Records an observation. A second observation of the same agent at the same visit
    /// replaces the first.
    pub fn record(&mut self, visit: VisitNumber, agent: Agent) {
        self.agents.insert(agent.id.clone());

        match self.baseline.get(&agent.id) {
            Some((baseline_visit, _)) if *baseline_visit <= visit => {}
            _ => {
                self.baseline
                    .insert(agent.id.clone(), (visit, agent.clone()));
            }
        }

        self.visits
            .entry(visit)
            .or_default()
            .insert(agent.id.clone(), agent);
    }
}
