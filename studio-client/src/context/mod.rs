//! Context normalization.
//!
//! Folds the flat context-listing response into the organization →
//! workspaces hierarchy used for selection and validation.

use crate::models::tenant::{AccessibleHierarchy, OrganizationGroup, WorkspaceEntry};
use crate::services::context_client::{OrganizationSummary, WorkspaceContext};

/// Build the hierarchy from the two flat listings.
///
/// Organizations without workspaces are kept so the UI can say "no
/// workspaces" instead of hiding the organization. A workspace whose
/// organization is missing from the summary list goes under a
/// synthesized entry keyed by that id; access data is never dropped.
/// Server order is preserved, synthesized entries come last.
pub fn normalize(
    contexts: &[WorkspaceContext],
    organizations: &[OrganizationSummary],
) -> AccessibleHierarchy {
    let mut groups: Vec<OrganizationGroup> = organizations
        .iter()
        .map(|org| OrganizationGroup {
            id: org.id.clone(),
            name: Some(org.name.clone()),
            workspaces: Vec::new(),
        })
        .collect();

    for context in contexts {
        let index = match groups.iter().position(|g| g.id == context.organization_id) {
            Some(index) => index,
            None => {
                groups.push(OrganizationGroup {
                    id: context.organization_id.clone(),
                    name: None,
                    workspaces: Vec::new(),
                });
                groups.len() - 1
            }
        };

        groups[index].workspaces.push(WorkspaceEntry {
            id: context.id.clone(),
            name: context.name.clone(),
            role: context.role,
        });
    }

    AccessibleHierarchy {
        organizations: groups,
    }
}
