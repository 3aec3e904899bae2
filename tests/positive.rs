use pretty_assertions::assert_eq;
use turtle_assist::{to_ntriples, Assistant, AssistantConfig};

fn init() {
	let _ = stderrlog::new().module("turtle_assist").verbosity(2).init();
}

struct Test {
	input: &'static str,
	expected_output: &'static [&'static str],
}

impl Test {
	pub fn run(self) {
		init();
		let mut assistant = Assistant::new(AssistantConfig::default()).unwrap();
		let formatted = assistant.load(self.input).unwrap().expect("document rejected");
		assert!(assistant.parser().is_empty(), "left open: {:?}", assistant.parser().text());

		let mut triples: Vec<String> = assistant.triples().map(to_ntriples).collect();
		triples.sort();
		let mut expected_triples: Vec<String> =
			self.expected_output.iter().map(|t| t.to_string()).collect();
		expected_triples.sort();
		assert_eq!(triples, expected_triples);

		// Formatting is a fixed point.
		let again = assistant.load(&formatted).unwrap();
		assert_eq!(again.as_deref(), Some(formatted.as_str()));
	}
}

macro_rules! positive_test {
	($($id:ident: $input:expr => [$($triple:expr),*]),* $(,)?) => {
		$(
			#[test]
			fn $id () {
				Test {
					input: $input,
					expected_output: &[$($triple),*],
				}.run()
			}
		)*
	};
}

positive_test! {
	prefixed_names: "@prefix : <http://a/> .\n:s :p :o .\n" => [
		"<http://a/s> <http://a/p> <http://a/o> ."
	],
	base_resolution: "@base <http://example.com/> .\n<erik> <knows> <ann> .\n" => [
		"<http://example.com/erik> <http://example.com/knows> <http://example.com/ann> ."
	],
	escapes: "<http://a/\\u0061> <http://a/p> \"\\U00000061\\\"\" .\n" => [
		"<http://a/a> <http://a/p> \"a\\\"\" ."
	],
	rdf_type: "@prefix : <http://a/> .\n:me a :Person .\n" => [
		"<http://a/me> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://a/Person> ."
	],
	object_list: "@prefix : <http://a/> .\n:s :p :o1, :o2 .\n" => [
		"<http://a/s> <http://a/p> <http://a/o1> .",
		"<http://a/s> <http://a/p> <http://a/o2> ."
	],
	predicate_list: "@prefix : <http://a/> .\n:s :p :o ; :q :r .\n" => [
		"<http://a/s> <http://a/p> <http://a/o> .",
		"<http://a/s> <http://a/q> <http://a/r> ."
	],
	numbers: "@prefix : <http://a/> .\n:s :p 12, -1.5, 1e3 .\n" => [
		"<http://a/s> <http://a/p> \"12\"^^<http://www.w3.org/2001/XMLSchema#integer> .",
		"<http://a/s> <http://a/p> \"-1.5\"^^<http://www.w3.org/2001/XMLSchema#decimal> .",
		"<http://a/s> <http://a/p> \"1e3\"^^<http://www.w3.org/2001/XMLSchema#double> ."
	],
	language_tags: "@prefix : <http://a/> .\n:s :p \"chat\"@fr .\n" => [
		"<http://a/s> <http://a/p> \"chat\"@fr ."
	],
	sparql_prefix: "PREFIX ex: <http://ex/>\nex:s ex:p ex:o .\n" => [
		"<http://ex/s> <http://ex/p> <http://ex/o> ."
	],
	unbound_prefix: ":s :p :o .\n" => [],
	semicolon_layout: "@prefix : <http://a/> .\n:s :p :o ;\n  :q :r .\n" => [
		"<http://a/s> <http://a/p> <http://a/o> .",
		"<http://a/s> <http://a/q> <http://a/r> ."
	],
	comma_layout: "@prefix : <http://a/> .\n:s :p :o1 ,\n  :o2 .\n" => [
		"<http://a/s> <http://a/p> <http://a/o1> .",
		"<http://a/s> <http://a/p> <http://a/o2> ."
	],
	long_strings: "@prefix : <http://a/> .\n:s :p \"\"\"a \"b\" c\"\"\", '''x''y''' .\n" => [
		"<http://a/s> <http://a/p> \"a \\\"b\\\" c\" .",
		"<http://a/s> <http://a/p> \"x''y\" ."
	],
	collections_and_blank_nodes: "@prefix : <http://a/> .\n:s :p ( :a :b ) ; :q [ :r :t ] ; :u :v .\n" => [
		"<http://a/s> <http://a/u> <http://a/v> ."
	],
	comments: "@prefix : <http://a/> .\n# about s\n:s :p :o ; # more\n  :q :r .\n" => [
		"<http://a/s> <http://a/p> <http://a/o> .",
		"<http://a/s> <http://a/q> <http://a/r> ."
	],
}

#[test]
fn layouts_are_indented() {
	init();
	let mut assistant = Assistant::new(AssistantConfig::default()).unwrap();
	assert_eq!(
		assistant
			.load(":s :p :o ;\n  :q :r .\n:t :p :o1 ,\n  :o2 .\n")
			.unwrap()
			.as_deref(),
		Some(":s\n  :p :o;\n  :q :r .\n:t\n  :p\n    :o1,\n    :o2 .\n")
	);
}
