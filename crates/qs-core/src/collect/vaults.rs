//! Known vaults.

use qs_config::Mode;

use super::{Collector, PassContext};
use crate::{MatchType, SourceError, Suggestion, VaultSuggestion};

/// Vaults, matched on name then path. The open vault is listed but downranked.
#[derive(Debug)]
pub struct VaultCollector;

impl Collector for VaultCollector {
    fn mode(&self) -> Mode {
        Mode::VaultList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        Ok(cx
            .source
            .vaults()?
            .into_iter()
            .filter_map(|vault| {
                let mut ranking = cx
                    .match_primary(&vault.name)
                    .or_else(|| cx.match_as(&vault.path, MatchType::Path))?;
                ranking.downranked = vault.is_open;
                let path_segments = vault
                    .path
                    .split(['/', '\\'])
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                Some(Suggestion::Vault(VaultSuggestion {
                    vault,
                    path_segments,
                    ranking,
                }))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use qs_config::Settings;
    use qs_match::Matcher;

    use super::*;
    use crate::{SourceContext, VaultEntry, VaultSource};

    struct Vaults;

    impl VaultSource for Vaults {
        fn vaults(&self) -> Result<Vec<VaultEntry>, SourceError> {
            Ok(vec![
                VaultEntry {
                    name: "work".to_string(),
                    path: "/home/me/vaults/work".to_string(),
                    is_open: true,
                },
                VaultEntry {
                    name: "personal".to_string(),
                    path: "/home/me/vaults/personal".to_string(),
                    is_open: false,
                },
            ])
        }
    }

    #[test]
    fn path_fallback_and_segments() {
        let settings = Settings::default();
        let matcher = Matcher::new();
        let context = SourceContext::default();
        let cx = PassContext {
            query: "vaults",
            settings: &settings,
            source: &Vaults,
            matcher: &matcher,
            context: &context,
        };
        let list = VaultCollector.candidates(&cx).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|s| s.match_type() == MatchType::Path));
        assert!(list[0].ranking().downranked);
        let Suggestion::Vault(v) = &list[1] else {
            panic!("expected a vault suggestion");
        };
        assert_eq!(v.path_segments, vec!["home", "me", "vaults", "personal"]);
    }
}
