//! Built-in report templates.
//!
//! Read-only, code-defined report definitions shipped with the application.
//! They have no persistence and no lifecycle beyond process start; saving a
//! modified copy goes through the saved-query store.

use crate::report::{
    AdvancedFilter, FilterOperator, QuerySpec, SortDirection, SortSpec,
};

/// A built-in, non-persisted report definition.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TemplatePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub spec: QuerySpec,
}

/// The presets shipped with the application.
pub fn builtin_presets() -> Vec<TemplatePreset> {
    vec![
        TemplatePreset {
            name: "Volunteer roster",
            description: "Active volunteers with their home city",
            spec: QuerySpec {
                table: "volunteers".into(),
                columns: vec![
                    "first_name".into(),
                    "last_name".into(),
                    "email".into(),
                    "cities.name".into(),
                ],
                include_relations: true,
                related_selections: [("cities".to_string(), vec!["name".to_string()])]
                    .into_iter()
                    .collect(),
                filters: vec![],
                sorts: vec![
                    SortSpec {
                        column: "last_name".into(),
                        direction: SortDirection::Asc,
                    },
                    SortSpec {
                        column: "first_name".into(),
                        direction: SortDirection::Asc,
                    },
                ],
            },
        },
        TemplatePreset {
            name: "Class capacity",
            description: "Resource-center classes nearing capacity",
            spec: QuerySpec {
                table: "classes".into(),
                columns: vec![
                    "title".into(),
                    "capacity".into(),
                    "enrolled".into(),
                    "communities.name".into(),
                ],
                include_relations: true,
                related_selections: [("communities".to_string(), vec!["name".to_string()])]
                    .into_iter()
                    .collect(),
                filters: vec![AdvancedFilter {
                    column: "enrolled".into(),
                    operator: FilterOperator::Gte,
                    value: "10".into(),
                    value_to: None,
                }],
                sorts: vec![SortSpec {
                    column: "enrolled".into(),
                    direction: SortDirection::Desc,
                }],
            },
        },
        TemplatePreset {
            name: "Hours by volunteer",
            description: "Logged service hours with the volunteer attached",
            spec: QuerySpec {
                table: "hour_logs".into(),
                columns: vec![
                    "logged_on".into(),
                    "hours".into(),
                    "volunteers.first_name".into(),
                    "volunteers.last_name".into(),
                ],
                include_relations: true,
                related_selections: [(
                    "volunteers".to_string(),
                    vec!["first_name".to_string(), "last_name".to_string()],
                )]
                .into_iter()
                .collect(),
                filters: vec![],
                sorts: vec![SortSpec {
                    column: "logged_on".into(),
                    direction: SortDirection::Desc,
                }],
            },
        },
    ]
}
