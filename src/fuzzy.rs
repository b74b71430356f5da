use crate::project::Project;

/// True when every character of `query` occurs in `name`, in order,
/// ignoring case. Characters need not be contiguous.
pub fn is_subsequence_match(name: &str, query: &str) -> bool {
    let name = name.to_lowercase();
    let query = query.to_lowercase();

    let mut wanted = query.chars().peekable();
    for c in name.chars() {
        match wanted.peek() {
            Some(&q) if q == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

/// Filter projects by fuzzy subsequence match on their name, keeping the
/// input order. An empty query returns every project.
pub fn filter_projects(projects: &[Project], query: &str) -> Vec<Project> {
    if query.is_empty() {
        return projects.to_vec();
    }

    projects
        .iter()
        .filter(|p| is_subsequence_match(&p.name, query))
        .cloned()
        .collect()
}
