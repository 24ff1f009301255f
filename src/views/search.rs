use crate::model::Task;

/// Outcome of a search. A blank query is its own state, distinct from a
/// query that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NoQuery,
    Matches {
        pending: Vec<Task>,
        completed: Vec<Task>,
    },
}

/// Case-insensitive substring match against title and notes, partitioned
/// into pending and completed groups.
pub fn search(tasks: &[Task], query: &str) -> SearchOutcome {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let (completed, pending) = tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&query)
                || t.notes
                    .as_deref()
                    .map_or(false, |n| n.to_lowercase().contains(&query))
        })
        .cloned()
        .partition(|t| t.completed);

    SearchOutcome::Matches { pending, completed }
}
