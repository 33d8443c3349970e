//! Pure ordering and filtering over project lists.
//!
//! A well-ordered list has every pinned project before every unpinned one,
//! and each of the two runs sorted by lowercased name. Sorting is stable,
//! so projects whose lowercased names are equal keep their relative order.

use std::{
    cmp::{Ordering, Reverse},
    collections::HashSet,
};

use crate::{
    domain::{Project, ProjectId},
    BoardError,
};

/// Pinned first, then by lowercased name.
pub fn compare(a: &Project, b: &Project) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| a.sort_key().cmp(&b.sort_key()))
}

pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by_cached_key(|project| (Reverse(project.pinned), project.sort_key()));
}

pub fn is_ordered(projects: &[Project]) -> bool {
    projects
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Drops every project whose id was already seen, keeping the first one.
///
/// Returns the remaining projects and the number of dropped duplicates.
pub fn dedupe_by_id(projects: Vec<Project>) -> (Vec<Project>, usize) {
    let mut seen = HashSet::new();
    let total = projects.len();
    let unique: Vec<Project> = projects
        .into_iter()
        .filter(|project| seen.insert(project.id.clone()))
        .collect();
    let dropped = total - unique.len();

    (unique, dropped)
}

/// Flips `pinned` on the addressed project and returns the reordered list.
///
/// The project is taken out and put back at the front when it becomes
/// pinned, or at the head of the unpinned run when it becomes unpinned,
/// before the whole list is stably sorted. The insertion point only
/// matters against projects with the same lowercased name.
pub fn toggle_pin(projects: &[Project], id: &ProjectId) -> Result<Vec<Project>, BoardError> {
    let index = projects
        .iter()
        .position(|project| &project.id == id)
        .ok_or_else(|| BoardError::ProjectNotFound(id.clone()))?;

    let mut reordered = projects.to_vec();
    let mut target = reordered.remove(index);
    target.pinned = !target.pinned;

    if target.pinned {
        reordered.insert(0, target);
    } else {
        let first_unpinned = reordered
            .iter()
            .position(|project| !project.pinned)
            .unwrap_or(reordered.len());
        reordered.insert(first_unpinned, target);
    }

    sort_projects(&mut reordered);
    Ok(reordered)
}

/// Active projects whose name contains `term`, ignoring case, in list order.
pub fn filter_displayed(projects: &[Project], term: &str) -> Vec<Project> {
    let needle = term.to_lowercase();

    projects
        .iter()
        .filter(|project| project.is_active())
        .filter(|project| project.sort_key().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectStatus;

    fn project(id: &str, name: &str, pinned: bool) -> Project {
        Project::new(id, name).with_pinned(pinned)
    }

    fn ids(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.id.as_str()).collect()
    }

    fn fixtures() -> Vec<Vec<Project>> {
        let mut fixtures = vec![
            vec![project("1", "Zeta", false), project("2", "Alpha", false)],
            vec![
                project("1", "zeta", false),
                project("2", "Alpha", true),
                project("3", "beta", false),
                project("4", "Gamma", true),
                project("5", "alpha", false),
                project("6", "Delta", false),
            ],
            vec![project("1", "Only", true)],
            vec![
                project("a", "Same", false),
                project("b", "same", false),
                project("c", "SAME", true),
            ],
        ];
        for projects in &mut fixtures {
            sort_projects(projects);
        }
        fixtures
    }

    #[test]
    fn pinning_moves_project_to_the_front() {
        let projects = vec![project("1", "Zeta", false), project("2", "Alpha", false)];

        let toggled = toggle_pin(&projects, &ProjectId::new("2")).unwrap();

        assert_eq!(ids(&toggled), vec!["2", "1"]);
        assert!(toggled[0].pinned);
        assert!(!toggled[1].pinned);
    }

    #[test]
    fn pinned_run_is_sorted_by_name() {
        let projects = vec![
            project("1", "Kestrel", true),
            project("2", "Bittern", false),
            project("3", "Avocet", false),
        ];

        let toggled = toggle_pin(&projects, &ProjectId::new("3")).unwrap();

        assert_eq!(ids(&toggled), vec!["3", "1", "2"]);
    }

    #[test]
    fn unpinning_returns_project_to_its_name_slot() {
        let projects = vec![
            project("1", "Merlin", true),
            project("2", "Crane", false),
            project("3", "Wren", false),
        ];

        let toggled = toggle_pin(&projects, &ProjectId::new("1")).unwrap();

        assert_eq!(ids(&toggled), vec!["2", "1", "3"]);
        assert!(toggled.iter().all(|p| !p.pinned));
    }

    #[test]
    fn unpinned_project_lands_first_among_equal_names() {
        let projects = vec![
            project("a", "Same", true),
            project("b", "same", false),
            project("c", "SAME", false),
        ];

        let toggled = toggle_pin(&projects, &ProjectId::new("a")).unwrap();

        assert_eq!(ids(&toggled), vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_keeps_input_order_of_equal_names() {
        let mut projects = vec![
            project("c", "beta", false),
            project("a", "BETA", false),
            project("p", "zulu", true),
            project("b", "Beta", false),
            project("q", "Alpha", false),
        ];

        sort_projects(&mut projects);

        assert_eq!(ids(&projects), vec!["p", "q", "c", "a", "b"]);
        assert!(is_ordered(&projects));
    }

    #[test]
    fn missing_project_is_reported() {
        let projects = vec![project("1", "Zeta", false)];

        assert_eq!(
            toggle_pin(&projects, &ProjectId::new("404")),
            Err(BoardError::ProjectNotFound(ProjectId::new("404")))
        );
    }

    #[test]
    fn toggle_keeps_list_ordered() {
        for projects in fixtures() {
            assert!(is_ordered(&projects));
            for target in &projects {
                let toggled = toggle_pin(&projects, &target.id).unwrap();
                assert!(is_ordered(&toggled), "unordered after toggling {}", target.id);
                assert_eq!(toggled.len(), projects.len());
            }
        }
    }

    #[test]
    fn double_toggle_restores_membership_and_flags() {
        for projects in fixtures() {
            for target in &projects {
                let once = toggle_pin(&projects, &target.id).unwrap();
                let twice = toggle_pin(&once, &target.id).unwrap();

                let mut before: Vec<(String, bool)> = projects
                    .iter()
                    .map(|p| (p.id.to_string(), p.pinned))
                    .collect();
                let mut after: Vec<(String, bool)> = twice
                    .iter()
                    .map(|p| (p.id.to_string(), p.pinned))
                    .collect();
                before.sort();
                after.sort();

                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let (unique, dropped) = dedupe_by_id(vec![
            project("1", "First", false),
            project("2", "Other", false),
            project("1", "Second", true),
        ]);

        assert_eq!(dropped, 1);
        assert_eq!(ids(&unique), vec!["1", "2"]);
        assert_eq!(unique[0].name, "First");
    }

    #[test]
    fn empty_search_returns_active_projects_in_order() {
        let projects = vec![
            project("1", "Alpha", true),
            project("2", "Beta", false).with_status(ProjectStatus::Inactive),
            project("3", "Gamma", false),
            project("4", "Delta", false).with_status(ProjectStatus::Other),
        ];

        assert_eq!(ids(&filter_displayed(&projects, "")), vec!["1", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let projects = vec![project("1", "Alpha", false), project("2", "Beta", false)];

        for term in ["alpha", "ALP", "pha"] {
            assert_eq!(ids(&filter_displayed(&projects, term)), vec!["1"], "term {term}");
        }
        assert!(filter_displayed(&projects, "omega").is_empty());
    }
}
