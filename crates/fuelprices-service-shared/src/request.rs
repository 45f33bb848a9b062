//! Query parameter types for HTTP endpoints.
//!
//! Parameters are checked for type only. Any `i64` limit and any `f64`
//! coordinate, non-finite values included, is forwarded to the provider.

use serde::{Deserialize, Serialize};

/// Query string of `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// Free-text search passed to the provider as-is.
    pub query: String,

    /// Optional cap on the number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// Query string of `GET /stations-within-radius`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadiusQuery {
    /// Latitude of the search centre.
    pub lat: f64,

    /// Longitude of the search centre.
    pub lng: f64,

    /// Search radius in kilometres.
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn query<T: serde::de::DeserializeOwned>(uri: &'static str) -> Option<T> {
        Query::<T>::try_from_uri(&Uri::from_static(uri))
            .ok()
            .map(|Query(q)| q)
    }

    #[test]
    fn test_search_query_deserialization_defaults() {
        let json = r#"{"query":"asda"}"#;
        let req: SearchQuery = serde_json::from_str(json).unwrap();
        assert_eq!(req.query, "asda");
        assert!(req.limit.is_none());
    }

    #[test]
    fn test_search_query_accepts_any_integer_limit() {
        let req: SearchQuery = query("/search?query=bp&limit=-1").unwrap();
        assert_eq!(req.limit, Some(-1));

        let req: SearchQuery = query("/search?query=bp&limit=0").unwrap();
        assert_eq!(req.limit, Some(0));

        assert!(query::<SearchQuery>("/search?query=bp&limit=2.5").is_none());
        assert!(query::<SearchQuery>("/search?query=bp&limit=ten").is_none());
    }

    #[test]
    fn test_radius_query_accepts_non_finite_numbers() {
        let req: RadiusQuery = query("/stations-within-radius?lat=inf&lng=-inf&radius=NaN").unwrap();
        assert_eq!(req.lat, f64::INFINITY);
        assert_eq!(req.lng, f64::NEG_INFINITY);
        assert!(req.radius.is_nan());
    }

    #[test]
    fn test_radius_query_requires_all_fields() {
        let json = r#"{"lat":51.5,"lng":-0.12}"#;
        let err = serde_json::from_str::<RadiusQuery>(json).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }
}
