use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

use crate::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
  #[default]
  All,
  Active,
  Completed
}

impl Filter {
  pub const ALL: [Filter; 3] = [
    Filter::All,
    Filter::Active,
    Filter::Completed
  ];

  pub fn slug(self) -> &'static str {
    match self {
      | Filter::All => "all",
      | Filter::Active => "active",
      | Filter::Completed => {
        "completed"
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Filter::All => "All",
      | Filter::Active => "Active",
      | Filter::Completed => {
        "Completed"
      }
    }
  }

  pub fn href(self) -> String {
    format!("#/{}", self.slug())
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Filter::All => true,
      | Filter::Active => {
        !task.completed
      }
      | Filter::Completed => {
        task.completed
      }
    }
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.slug())
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "unknown filter `{}` (expected \
       all, active or completed)",
      self.0
    )
  }
}

impl std::error::Error
  for UnknownFilter
{
}

impl FromStr for Filter {
  type Err = UnknownFilter;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let slug = s
      .trim()
      .trim_start_matches("#/")
      .to_ascii_lowercase();
    Filter::ALL
      .into_iter()
      .find(|filter| {
        filter.slug() == slug
      })
      .ok_or_else(|| {
        UnknownFilter(s.to_string())
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_slugs_and_hrefs() {
    assert_eq!(
      "Active".parse::<Filter>(),
      Ok(Filter::Active)
    );
    assert_eq!(
      "#/completed".parse::<Filter>(),
      Ok(Filter::Completed)
    );
    assert_eq!(
      " all ".parse::<Filter>(),
      Ok(Filter::All)
    );
    assert!(
      "done".parse::<Filter>().is_err()
    );
  }

  #[test]
  fn href_round_trips_through_parse() {
    for filter in Filter::ALL {
      assert_eq!(
        filter.href().parse::<Filter>(),
        Ok(filter)
      );
    }
  }

  #[test]
  fn default_is_all() {
    assert_eq!(
      Filter::default(),
      Filter::All
    );
  }
}
