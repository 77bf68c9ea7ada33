use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Bio field whose value is an external link to a full biography.
pub const FULLBIO_KEY: &str = "fullbio";

/// A person in the network, as loaded from the dataset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Person {
	pub id: u32,
	pub name: String,
	/// Free-form labeled biography fields ("born", "died", ...).
	#[serde(default)]
	pub bio: BTreeMap<String, String>,
}

impl Person {
	/// External full-biography link, if the bio carries one.
	pub fn fullbio(&self) -> Option<&str> {
		self.bio.get(FULLBIO_KEY).map(String::as_str)
	}
}

/// A single letter exchanged within a relationship. `from` and `to`
/// are indices into the dataset's people list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Letter {
	pub title: String,
	pub from: usize,
	pub to: usize,
	/// URL or path of the letter body, rendered in an embedded frame.
	pub content: String,
}

/// A correspondence between two people, identified by person id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Relationship {
	pub id: u32,
	pub source: u32,
	pub target: u32,
	#[serde(default)]
	pub letters: Vec<Letter>,
}

/// The whole dataset, fetched once per view mount and immutable after.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Dataset {
	#[serde(default)]
	pub people: Vec<Person>,
	#[serde(default)]
	pub relationships: Vec<Relationship>,
}

/// Why a dataset could not be loaded or accepted.
#[derive(Debug, Error)]
pub enum DataError {
	#[error("fetching dataset failed: {0}")]
	Fetch(#[from] gloo_net::Error),
	#[error("dataset is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("relationship {relationship} references unknown person {person}")]
	DanglingPerson { relationship: u32, person: u32 },
	#[error("letter {letter} of relationship {relationship} indexes person {index} out of bounds")]
	LetterIndex {
		relationship: u32,
		letter: usize,
		index: usize,
	},
}

impl Dataset {
	/// Look a person up by id.
	pub fn person_by_id(&self, id: u32) -> Option<&Person> {
		self.people.iter().find(|p| p.id == id)
	}

	/// Person name by list index, for letter sender/recipient lines.
	pub fn person_name(&self, index: usize) -> Option<&str> {
		self.people.get(index).map(|p| p.name.as_str())
	}

	/// Check the referential invariants: every relationship endpoint
	/// resolves to a person, every letter index is in bounds.
	pub fn validate(&self) -> Result<(), DataError> {
		for rel in &self.relationships {
			for endpoint in [rel.source, rel.target] {
				if self.person_by_id(endpoint).is_none() {
					return Err(DataError::DanglingPerson {
						relationship: rel.id,
						person: endpoint,
					});
				}
			}
			for (i, letter) in rel.letters.iter().enumerate() {
				for index in [letter.from, letter.to] {
					if index >= self.people.len() {
						return Err(DataError::LetterIndex {
							relationship: rel.id,
							letter: i,
							index,
						});
					}
				}
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TWO_PEOPLE: &str = r#"{
		"people": [
			{"id": 1, "name": "A", "bio": {"born": "1900"}},
			{"id": 2, "name": "B", "bio": {"born": "1910"}}
		],
		"relationships": [
			{"id": 1, "source": 1, "target": 2,
			 "letters": [{"title": "L1", "from": 0, "to": 1, "content": "x.html"}]}
		]
	}"#;

	#[test]
	fn parses_a_small_dataset() {
		let data: Dataset = serde_json::from_str(TWO_PEOPLE).unwrap();
		assert_eq!(data.people.len(), 2);
		assert_eq!(data.relationships.len(), 1);
		assert_eq!(data.relationships[0].letters[0].title, "L1");
		assert_eq!(data.people[0].bio.get("born").unwrap(), "1900");
		assert!(data.validate().is_ok());
	}

	#[test]
	fn missing_bio_and_letters_default_to_empty() {
		let data: Dataset = serde_json::from_str(
			r#"{"people": [{"id": 7, "name": "C"}],
			    "relationships": [{"id": 1, "source": 7, "target": 7}]}"#,
		)
		.unwrap();
		assert!(data.people[0].bio.is_empty());
		assert!(data.relationships[0].letters.is_empty());
	}

	#[test]
	fn validate_rejects_dangling_endpoint() {
		let mut data: Dataset = serde_json::from_str(TWO_PEOPLE).unwrap();
		data.relationships[0].target = 99;
		match data.validate() {
			Err(DataError::DanglingPerson {
				relationship: 1,
				person: 99,
			}) => {}
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn validate_rejects_letter_index_out_of_bounds() {
		let mut data: Dataset = serde_json::from_str(TWO_PEOPLE).unwrap();
		data.relationships[0].letters[0].to = 5;
		match data.validate() {
			Err(DataError::LetterIndex { index: 5, .. }) => {}
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn person_lookups() {
		let data: Dataset = serde_json::from_str(TWO_PEOPLE).unwrap();
		assert_eq!(data.person_by_id(2).unwrap().name, "B");
		assert_eq!(data.person_name(0), Some("A"));
		assert_eq!(data.person_name(9), None);
	}

	#[test]
	fn fullbio_field_is_exposed() {
		let person = Person {
			id: 1,
			name: "A".into(),
			bio: BTreeMap::from([(FULLBIO_KEY.to_string(), "https://example.org/a".to_string())]),
		};
		assert_eq!(person.fullbio(), Some("https://example.org/a"));
	}
}
