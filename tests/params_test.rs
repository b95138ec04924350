//! Tests for input parameter extraction

use pl_transpile::{extract_parameters, Dialect, ParameterDescriptor, ParameterExtractor};

fn names(params: &[ParameterDescriptor]) -> Vec<&str> {
    params.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_two_properties_in_declaration_order() {
    let source = r#"
        public Crossover(object _ctx) : base(_ctx)
        {
            SlowLength = 26;
            FastLength = 12;
        }

        [Input]
        public int FastLength { get; set; }

        [Input]
        public int SlowLength { get; set; }
    "#;
    let params = extract_parameters(source);
    assert_eq!(params.len(), 2);
    assert_eq!(names(&params), vec!["FastLength", "SlowLength"]);
    assert_eq!(params[0].declared_type, "int");
    assert_eq!(params[0].default_value.as_deref(), Some("12"));
    assert_eq!(params[1].default_value.as_deref(), Some("26"));
}

#[test]
fn test_no_declarations_gives_empty() {
    assert!(extract_parameters("").is_empty());
    assert!(extract_parameters("public int Length { get; set; }").is_empty());
    assert!(extract_parameters("protected override void CalcBar() {}").is_empty());
}

#[test]
fn test_malformed_input_gives_empty() {
    for source in ["[Input", "[Input] public", "[Input] public int", "[Input]]]]", "\u{0}\u{1}[[]]"] {
        assert!(extract_parameters(source).is_empty(), "{source:?}");
    }
}

#[test]
fn test_duplicates_are_kept() {
    let source = "[Input] public int Length { get; set; }\n[Input] public int Length { get; set; }";
    let params = extract_parameters(source);
    assert_eq!(names(&params), vec!["Length", "Length"]);
}

#[test]
fn test_inline_initializers() {
    let source = r#"
        [Input] public int Fast = 9;
        [Input] public double Ratio { get; set; } = 1.5;
        [Input] public string Label { get; set; } = "entry";
    "#;
    let params = extract_parameters(source);
    assert_eq!(names(&params), vec!["Fast", "Ratio", "Label"]);
    assert_eq!(params[0].default_value.as_deref(), Some("9"));
    assert_eq!(params[1].declared_type, "double");
    assert_eq!(params[1].default_value.as_deref(), Some("1.5"));
    assert_eq!(params[2].default_value.as_deref(), Some("\"entry\""));
}

#[test]
fn test_missing_default_is_none() {
    let params = extract_parameters("[Input] public bool UseStops { get; set; }");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].declared_type, "bool");
    assert_eq!(params[0].default_value, None);
}

#[test]
fn test_attribute_arguments_and_extra_attributes() {
    let source = r#"
        [Input("Lookback")]
        [Description("Bars to look back")]
        public int Lookback { get; set; }
    "#;
    let params = extract_parameters(source);
    assert_eq!(names(&params), vec!["Lookback"]);
}

#[test]
fn test_type_forms() {
    let source = r#"
        [Input] public List<int> Levels { get; set; }
        [Input] public double? StopLoss { get; set; }
        [Input] public double[] Weights { get; set; }
        [Input] public static System.DayOfWeek Day { get; set; }
        [Input] private Dictionary<string, int> Map { get; set; }
    "#;
    let params = extract_parameters(source);
    let types: Vec<&str> = params.iter().map(|p| p.declared_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["List<int>", "double?", "double[]", "System.DayOfWeek", "Dictionary<string, int>"]
    );
    assert_eq!(names(&params), vec!["Levels", "StopLoss", "Weights", "Day", "Map"]);
}

#[test]
fn test_comparisons_are_not_defaults() {
    let source = r#"
        [Input] public int Length { get; set; }
        protected override void CalcBar()
        {
            if (Length == 3 || Length >= 5) {}
        }
    "#;
    let params = extract_parameters(source);
    assert_eq!(params[0].default_value, None);
}

#[test]
fn test_accessor_bodies_and_expression_bodies() {
    let source = r#"
        private int m_len;

        [Input]
        public int Length
        {
            get { return m_len; }
            set { m_len = value; }
        }

        [Input] public int Fast => 5;
        [Input] public int Slow { get; set; }
    "#;
    let params = extract_parameters(source);
    assert_eq!(params.len(), 3);
    assert_eq!(names(&params), vec!["Length", "Fast", "Slow"]);
    assert_eq!(params[0].default_value, None);
    assert_eq!(params[1].default_value.as_deref(), Some("5"));
    assert_eq!(params[2].default_value, None);
}

#[test]
fn test_accessor_body_with_initializer() {
    let source = "[Input] public double Risk { get { return r; } set { r = value; } } = 0.5;";
    let params = extract_parameters(source);
    assert_eq!(names(&params), vec!["Risk"]);
    assert_eq!(params[0].default_value.as_deref(), Some("0.5"));
}

#[test]
fn test_runtime_assignments_are_not_defaults() {
    let source = r#"
        [Input] public double Length { get; set; }
        [Input] public int Period { get; set; }

        public Trend(object _ctx) : base(_ctx)
        {
            this.Period = 20;
        }

        protected override void CalcBar()
        {
            Length = Bars.Close[0];
            other.Period = 5;
            if (Bars.Close[0] > 0) { Period = 3; }
        }
    "#;
    let params = extract_parameters(source);
    assert_eq!(params[0].default_value, None);
    assert_eq!(params[1].default_value.as_deref(), Some("20"));
}

#[test]
fn test_foreign_receiver_is_not_a_default() {
    let source = "[Input] public int Length { get; set; }
void Setup() { other.Length = 5; }";
    assert_eq!(extract_parameters(source)[0].default_value, None);
}

#[test]
fn test_custom_attribute_name() {
    let dialect = Dialect {
        input_attribute: "Param".to_string(),
        ..Dialect::default()
    };
    let extractor = ParameterExtractor::for_dialect(&dialect).unwrap();
    let source = "[Param] public int A { get; set; }\n[Input] public int B { get; set; }";
    assert_eq!(names(&extractor.extract(source)), vec!["A"]);
}

#[test]
fn test_descriptor_json_shape() {
    let params = extract_parameters("[Input] public int Length { get; set; }");
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json[0]["name"], "Length");
    assert_eq!(json[0]["declaredType"], "int");
    assert!(json[0].get("defaultValue").is_none());
}
