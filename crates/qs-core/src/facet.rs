//! Facets: named, toggleable filters scoped to modes.
//!
//! The [`FacetManager`] owns the session's working copy of the facet catalogue. It knows which
//! facets are available for the active modes and which are switched on, but nothing about what
//! a facet means: predicates are supplied by the caller of [`apply_filters`].

use qs_config::{FacetDefinition, FacetSettings, Modifier, ModeSet, same_modifiers};
use serde::Serialize;
use tracing::debug;

/// A facet with its derived availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Stable id.
    pub id: String,
    /// Modes the facet applies to.
    pub modes: ModeSet,
    /// Display label.
    pub label: String,
    /// The filter is switched on.
    pub is_active: bool,
    /// The facet applies to the active modes.
    pub is_available: bool,
    /// Explicit hotkey.
    pub key: Option<String>,
    /// Modifiers for the explicit hotkey.
    pub modifiers: Option<Vec<Modifier>>,
}

impl Facet {
    /// Builds a facet, deriving availability from `modes`.
    fn from_definition(def: FacetDefinition, modes: &ModeSet) -> Self {
        let is_available = def.modes.intersects(modes);
        Self {
            id: def.id,
            modes: def.modes,
            label: def.label,
            is_active: def.is_active,
            is_available,
            key: def.key,
            modifiers: def.modifiers,
        }
    }

    /// Converts back to the persisted form.
    fn to_definition(&self) -> FacetDefinition {
        FacetDefinition {
            id: self.id.clone(),
            modes: self.modes.clone(),
            label: self.label.clone(),
            is_active: self.is_active,
            key: self.key.clone(),
            modifiers: self.modifiers.clone(),
        }
    }
}

/// Session-scoped facet state.
#[derive(Debug, Clone)]
pub struct FacetManager {
    /// Working copy of the settings the manager was built from.
    settings: FacetSettings,
    /// Facets in catalogue order.
    facets: Vec<Facet>,
    /// Modes availability is computed for.
    modes: ModeSet,
}

impl FacetManager {
    /// Creates a manager from persisted settings. No mode is active yet.
    pub fn new(settings: &FacetSettings) -> Self {
        let modes = ModeSet::new();
        let facets = settings
            .ordered_facets()
            .into_iter()
            .map(|def| Facet::from_definition(def, &modes))
            .collect();
        Self {
            settings: settings.clone(),
            facets,
            modes,
        }
    }

    /// Adds a facet to the catalogue, replacing one with the same id.
    pub fn register(&mut self, def: FacetDefinition) {
        let facet = Facet::from_definition(def, &self.modes);
        match self.facets.iter_mut().find(|f| f.id == facet.id) {
            Some(existing) => *existing = facet,
            None => self.facets.push(facet),
        }
    }

    /// Makes `modes` the active mode set and recomputes availability.
    ///
    /// When the set changed and resetting on mode change is configured, every facet is
    /// switched off.
    pub fn set_modes(&mut self, modes: &ModeSet) {
        if &self.modes == modes {
            return;
        }
        self.modes = modes.clone();
        for facet in &mut self.facets {
            facet.is_available = facet.modes.intersects(modes);
        }
        if self.settings.should_reset_active_facets {
            for facet in &mut self.facets {
                facet.is_active = false;
            }
        }
    }

    /// The active mode set.
    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    /// Every facet in catalogue order.
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Looks up a facet by id.
    pub fn get(&self, id: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.id == id)
    }

    /// Facets available for the active modes, in catalogue order.
    pub fn available_facets(&self) -> Vec<&Facet> {
        self.facets.iter().filter(|f| f.is_available).collect()
    }

    /// Facets whose modes intersect `modes`, regardless of the active set.
    pub fn available_facets_for(&self, modes: &ModeSet) -> Vec<&Facet> {
        self.facets
            .iter()
            .filter(|f| f.modes.intersects(modes))
            .collect()
    }

    /// Flips a facet.
    ///
    /// Unknown or unavailable facets are left alone and `false` is returned. Activating a
    /// member of an exclusive group switches the other members off.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(index) = self.facets.iter().position(|f| f.id == id && f.is_available) else {
            debug!(facet = id, "ignoring toggle of unavailable facet");
            return false;
        };

        let activate = !self.facets[index].is_active;
        if activate {
            let peers: Vec<String> = self
                .settings
                .exclusive_groups
                .iter()
                .filter(|group| group.iter().any(|g| g == id))
                .flatten()
                .filter(|g| g.as_str() != id)
                .cloned()
                .collect();
            for facet in &mut self.facets {
                if peers.contains(&facet.id) {
                    facet.is_active = false;
                }
            }
        }
        self.facets[index].is_active = activate;
        true
    }

    /// Switches off every facet available for the active modes.
    ///
    /// Returns true if anything changed.
    pub fn reset(&mut self) -> bool {
        let mut changed = false;
        for facet in self.facets.iter_mut().filter(|f| f.is_available) {
            changed |= facet.is_active;
            facet.is_active = false;
        }
        changed
    }

    /// Active facets available for the active modes.
    pub fn active_facets(&self) -> Vec<&Facet> {
        self.facets
            .iter()
            .filter(|f| f.is_available && f.is_active)
            .collect()
    }

    /// Ids of the active facets.
    pub fn active_ids(&self) -> Vec<String> {
        self.active_facets()
            .into_iter()
            .map(|f| f.id.clone())
            .collect()
    }

    /// Resolves a key press to the facet it toggles.
    ///
    /// An explicit per-facet key wins; otherwise keys from the key list map positionally onto
    /// the available facets and must be pressed with the shared modifiers.
    pub fn facet_for_key(&self, key: &str, modifiers: &[Modifier]) -> Option<&str> {
        let available = self.available_facets();
        let explicit = available.iter().copied().find(|f| {
            f.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key))
                && same_modifiers(
                    f.modifiers.as_deref().unwrap_or(&self.settings.modifiers),
                    modifiers,
                )
        });
        if let Some(facet) = explicit {
            return Some(&facet.id);
        }

        if !same_modifiers(&self.settings.modifiers, modifiers) {
            return None;
        }
        let position = self
            .settings
            .key_list
            .iter()
            .position(|k| k.eq_ignore_ascii_case(key))?;
        available
            .into_iter()
            .filter(|f| f.key.is_none())
            .nth(position)
            .map(|f| f.id.as_str())
    }

    /// Returns true if the key press is the reset hotkey.
    pub fn is_reset_key(&self, key: &str, modifiers: &[Modifier]) -> bool {
        let expected = self
            .settings
            .reset_modifiers
            .as_deref()
            .unwrap_or(&self.settings.modifiers);
        self.settings.reset_key.eq_ignore_ascii_case(key) && same_modifiers(expected, modifiers)
    }

    /// Returns settings carrying the current facet state, for the explicit save path.
    pub fn snapshot(&self) -> FacetSettings {
        let mut settings = self.settings.clone();
        settings.facet_list = self
            .facets
            .iter()
            .map(|f| (f.id.clone(), f.to_definition()))
            .collect();
        settings
    }
}

/// Keeps the candidates that satisfy every active facet.
///
/// `predicate(id, candidate)` decides whether a candidate passes one facet. With no active
/// facets the candidates are returned unchanged.
pub fn apply_filters<T, P>(candidates: Vec<T>, active_ids: &[String], predicate: P) -> Vec<T>
where
    P: Fn(&str, &T) -> bool,
{
    if active_ids.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|c| active_ids.iter().all(|id| predicate(id, c)))
        .collect()
}
