use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ordering {
    pub column: String,
    pub direction: Direction,
}

/// A select with equality filters and an optional sort, mirroring what the
/// hosted service accepts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    projection: String,
    filters: Vec<(String, String)>,
    order: Option<Ordering>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            projection: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Columns to return. Embedded relations use `relation(col_a, col_b)`.
    /// Whitespace is insignificant.
    pub fn select(mut self, projection: &str) -> Self {
        self.projection = projection.chars().filter(|c| !c.is_whitespace()).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Ordering {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<&Ordering> {
        self.order.as_ref()
    }

    /// Encode as PostgREST query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.projection.clone())];
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(order) = &self.order {
            params.push((
                "order".to_string(),
                format!("{}.{}", order.column, order.direction.as_str()),
            ));
        }
        params
    }

    /// Embedded relations requested by the projection, with their columns.
    pub fn embedded(&self) -> Vec<(String, Vec<String>)> {
        split_top_level(&self.projection)
            .into_iter()
            .filter_map(|item| {
                let open = item.find('(')?;
                let name = item[..open].to_string();
                let inner = item[open + 1..].trim_end_matches(')');
                let columns = inner
                    .split(',')
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect();
                Some((name, columns))
            })
            .collect()
    }
}

fn split_top_level(projection: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in projection.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&projection[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < projection.len() {
        items.push(&projection[start..]);
    }
    items
}
