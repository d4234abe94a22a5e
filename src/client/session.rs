//! Client session state.
//!
//! [`SessionState`] is an immutable value: each transition returns a new
//! state. Every search gets a generation number, and results tagged with an
//! older generation are discarded, so a slow response can never overwrite the
//! answer to a newer search.

use crate::{
    client::{
        errors::{ClientError, ErrorNotice},
        input::validate_city,
        recent::RecentSearches,
    },
    models::WeatherView,
    services::display::UnitSystem,
};

/// A search in flight
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub city: String,
    pub units: UnitSystem,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded(Box<WeatherView>),
    Failed(ErrorNotice),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub units: UnitSystem,
    /// City of the latest accepted search
    pub city: Option<String>,
    pub recent: RecentSearches,
    generation: u64,
}

impl SessionState {
    pub fn new(units: UnitSystem, recent: RecentSearches) -> Self {
        Self {
            units,
            recent,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validate input and start a search. Invalid input yields a failed
    /// state and no ticket.
    pub fn begin_search(&self, raw_city: &str) -> (Self, Option<SearchTicket>) {
        match validate_city(raw_city) {
            Ok(city) => {
                let generation = self.generation + 1;
                let ticket = SearchTicket {
                    city: city.clone(),
                    units: self.units,
                    generation,
                };
                let next = Self {
                    phase: Phase::Loading,
                    city: Some(city),
                    generation,
                    ..self.clone()
                };
                (next, Some(ticket))
            }
            Err(error) => (self.with_error(&error), None),
        }
    }

    fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Show a successful result and remember the city
    pub fn apply_result(&self, ticket: &SearchTicket, view: WeatherView, now_ms: i64) -> Self {
        if !self.is_current(ticket) {
            tracing::debug!(city = %ticket.city, generation = ticket.generation, "Discarding stale result");
            return self.clone();
        }

        let mut recent = self.recent.clone();
        recent.record(&ticket.city, now_ms);

        Self {
            phase: Phase::Loaded(Box::new(view)),
            recent,
            ..self.clone()
        }
    }

    pub fn fail(&self, ticket: &SearchTicket, error: &ClientError) -> Self {
        if !self.is_current(ticket) {
            return self.clone();
        }
        self.with_error(error)
    }

    fn with_error(&self, error: &ClientError) -> Self {
        Self {
            phase: Phase::Failed(ErrorNotice::present(error)),
            ..self.clone()
        }
    }

    pub fn dismiss_error(&self) -> Self {
        match self.phase {
            Phase::Failed(_) => Self {
                phase: Phase::Idle,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Switch units. When a city is showing, a refresh ticket is issued.
    pub fn toggle_unit(&self) -> (Self, Option<SearchTicket>) {
        let toggled = Self {
            units: self.units.toggled(),
            ..self.clone()
        };

        match toggled.city.clone() {
            Some(city) => toggled.begin_search(&city),
            None => (toggled, None),
        }
    }

    pub fn clear_recent(&self) -> Self {
        Self {
            recent: RecentSearches::default(),
            ..self.clone()
        }
    }
}
