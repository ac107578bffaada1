//! States of the Legal Amazon served by the single-state correlation routes.

use crate::error::PipelineError;

use strum_macros::Display;

/// A state with its own correlation chart.
///
/// `Display` yields the name used as join key in the datasets.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum State {
    Acre,
    Amapa,
    Amazonas,
    Maranhao,
    #[strum(serialize = "Mato Grosso")]
    MatoGrosso,
    Para,
    Rondonia,
    Tocantins,
    Roraima,
}

impl State {
    /// Every state, in route order.
    pub const ALL: [State; 9] = [
        State::Acre,
        State::Amapa,
        State::Amazonas,
        State::Maranhao,
        State::MatoGrosso,
        State::Para,
        State::Rondonia,
        State::Tocantins,
        State::Roraima,
    ];

    /// URL path segment of the state's chart.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Acre => "acre",
            Self::Amapa => "amapa",
            Self::Amazonas => "amazonas",
            Self::Maranhao => "maranhao",
            Self::MatoGrosso => "mato_grosso",
            Self::Para => "para",
            Self::Rondonia => "rondonia",
            Self::Tocantins => "tocantins",
            Self::Roraima => "roraima",
        }
    }

    /// Name shown in chart titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::MatoGrosso => "Mato-Grosso",
            Self::Acre => "Acre",
            Self::Amapa => "Amapa",
            Self::Amazonas => "Amazonas",
            Self::Maranhao => "Maranhao",
            Self::Para => "Para",
            Self::Rondonia => "Rondonia",
            Self::Tocantins => "Tocantins",
            Self::Roraima => "Roraima",
        }
    }

    /// Look up a state by its path segment.
    ///
    /// Fails with [PipelineError::NotFound] for anything outside the enumerated set.
    pub fn from_slug(slug: &str) -> Result<State, PipelineError> {
        Self::ALL
            .into_iter()
            .find(|state| state.slug() == slug)
            .ok_or_else(|| PipelineError::NotFound {
                path: format!("/{slug}"),
            })
    }
}
