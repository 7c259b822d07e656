/// Palette a tag can be drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagColor {
	Black,
	Blue,
	Green,
	Grey,
	Magenta,
	Red,
	Yellow,
}

impl TagColor {
	/// Case-insensitive keyword lookup. Unknown keywords have no color.
	pub fn parse(keyword: &str) -> Option<Self> {
		match keyword.to_ascii_lowercase().as_str() {
			"black" => Some(Self::Black),
			"blue" => Some(Self::Blue),
			"green" => Some(Self::Green),
			"grey" => Some(Self::Grey),
			"magenta" => Some(Self::Magenta),
			"red" => Some(Self::Red),
			"yellow" => Some(Self::Yellow),
			_ => None,
		}
	}

	pub fn class(self) -> &'static str {
		match self {
			Self::Black => "span-tag-black",
			Self::Blue => "span-tag-blue",
			Self::Green => "span-tag-green",
			Self::Grey => "span-tag-grey",
			Self::Magenta => "span-tag-magenta",
			Self::Red => "span-tag-red",
			Self::Yellow => "span-tag-yellow",
		}
	}
}

/// Class list of a tag element.
pub fn tag_class(color: Option<&str>, dashed: bool, visible: bool, extra: Option<&str>) -> String {
	let mut classes = vec!["span-tag"];
	classes.extend(extra.filter(|c| !c.is_empty()));
	classes.extend(color.and_then(TagColor::parse).map(TagColor::class));
	if dashed {
		classes.push("span-tag-dashed");
	}
	if !visible {
		classes.push("span-tag-invisible");
	}
	classes.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lookup_ignores_case() {
		assert_eq!(TagColor::parse("RED"), Some(TagColor::Red));
		assert_eq!(TagColor::parse("red"), TagColor::parse("Red"));
		assert_eq!(
			tag_class(Some("RED"), false, true, None),
			tag_class(Some("red"), false, true, None)
		);
	}

	#[test]
	fn test_unknown_color_has_no_class() {
		assert_eq!(TagColor::parse("purple"), None);
		assert_eq!(tag_class(Some("purple"), false, true, None), "span-tag");
	}

	#[test]
	fn test_every_keyword_maps() {
		for keyword in ["black", "blue", "green", "grey", "magenta", "red", "yellow"] {
			let color = TagColor::parse(keyword).unwrap();
			assert_eq!(color.class(), format!("span-tag-{keyword}"));
		}
	}

	#[test]
	fn test_flags() {
		assert_eq!(
			tag_class(Some("blue"), true, false, Some("filter-tag")),
			"span-tag filter-tag span-tag-blue span-tag-dashed span-tag-invisible"
		);
		assert_eq!(tag_class(None, false, true, Some("")), "span-tag");
	}
}
