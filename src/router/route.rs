/// The fixed route table. Parsed from a `#/<route>/<params...>` hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Default route; redirects to the province list.
    Index,
    Provinces,
    Taxes { code: String },
    Calculator,
}

impl Route {
    /// Resolve a hash fragment. Anything that does not name a known route
    /// with its required parameters resolves to [`Route::Index`].
    pub fn parse(hash: &str) -> Route {
        let Some(path) = hash.strip_prefix("#/") else {
            return Route::Index;
        };

        let mut segments = path.split('/');
        let name = segments.next().unwrap_or_default();
        let params: Vec<&str> = segments.collect();

        Self::from_parts(name, &params).unwrap_or_else(|| {
            tracing::debug!(hash, "No matching route, using default");
            Route::Index
        })
    }

    fn from_parts(name: &str, params: &[&str]) -> Option<Route> {
        match name {
            "index" => Some(Route::Index),
            "provinces" => Some(Route::Provinces),
            "taxes" => params
                .first()
                .filter(|code| !code.is_empty())
                .map(|code| Route::Taxes {
                    code: code.to_string(),
                }),
            "calculator" => Some(Route::Calculator),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Index => "index",
            Route::Provinces => "provinces",
            Route::Taxes { .. } => "taxes",
            Route::Calculator => "calculator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_malformed_hashes_use_default() {
        for hash in ["", "#", "#/", "provinces", "/provinces", "#provinces"] {
            assert_eq!(Route::parse(hash), Route::Index, "hash {:?}", hash);
        }
    }

    #[test]
    fn unknown_route_matches_empty_hash() {
        assert_eq!(Route::parse("#/nonexistent/1"), Route::parse(""));
    }

    #[test]
    fn named_routes() {
        assert_eq!(Route::parse("#/provinces"), Route::Provinces);
        assert_eq!(Route::parse("#/calculator"), Route::Calculator);
        assert_eq!(Route::parse("#/index"), Route::Index);
    }

    #[test]
    fn route_names_are_case_sensitive() {
        assert_eq!(Route::parse("#/Provinces"), Route::Index);
    }

    #[test]
    fn params_stay_strings() {
        assert_eq!(
            Route::parse("#/taxes/007"),
            Route::Taxes {
                code: "007".to_string()
            }
        );
    }

    #[test]
    fn extra_params_are_ignored() {
        assert_eq!(
            Route::parse("#/taxes/ON/extra"),
            Route::Taxes {
                code: "ON".to_string()
            }
        );
        assert_eq!(Route::parse("#/calculator/1"), Route::Calculator);
    }

    #[test]
    fn missing_required_param_uses_default() {
        assert_eq!(Route::parse("#/taxes"), Route::Index);
        assert_eq!(Route::parse("#/taxes/"), Route::Index);
    }
}
