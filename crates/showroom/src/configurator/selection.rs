use serde::{Deserialize, Serialize};

use crate::catalog::{CarDetail, ColorOption, Trim};

/// Trim and color codes currently chosen on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exterior_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior_code: Option<String>,
}

impl Selection {
    pub fn new(
        trim_code: Option<&str>,
        exterior_code: Option<&str>,
        interior_code: Option<&str>,
    ) -> Self {
        Self {
            trim_code: trim_code.map(str::to_string),
            exterior_code: exterior_code.map(str::to_string),
            interior_code: interior_code.map(str::to_string),
        }
    }

    /// First option of every list, as shown when the page first loads.
    pub fn defaults(detail: &CarDetail) -> Self {
        Self::default().reconcile(detail)
    }

    /// Keep codes that still exist in `detail`; anything else falls back to the
    /// first option of its list, or nothing when the list is empty.
    pub fn reconcile(&self, detail: &CarDetail) -> Self {
        let keep_or_first = |current: Option<&String>, codes: Vec<&String>| {
            current
                .filter(|code| codes.contains(code))
                .or_else(|| codes.first().copied())
                .cloned()
        };

        Self {
            trim_code: keep_or_first(
                self.trim_code.as_ref(),
                detail.trims.iter().map(|trim| &trim.code).collect(),
            ),
            exterior_code: keep_or_first(
                self.exterior_code.as_ref(),
                detail.colors.exterior.iter().map(|color| &color.code).collect(),
            ),
            interior_code: keep_or_first(
                self.interior_code.as_ref(),
                detail.colors.interior.iter().map(|color| &color.code).collect(),
            ),
        }
    }

    pub fn trim<'a>(&self, detail: &'a CarDetail) -> Option<&'a Trim> {
        self.trim_code.as_deref().and_then(|code| detail.trim(code))
    }

    pub fn exterior<'a>(&self, detail: &'a CarDetail) -> Option<&'a ColorOption> {
        self.exterior_code
            .as_deref()
            .and_then(|code| detail.exterior(code))
    }

    pub fn interior<'a>(&self, detail: &'a CarDetail) -> Option<&'a ColorOption> {
        self.interior_code
            .as_deref()
            .and_then(|code| detail.interior(code))
    }
}
