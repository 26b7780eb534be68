use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

use super::Operation;
use super::request::{GetFoodByEan13Args, GetFoodByIdArgs, GetFoodsArgs, SearchFoodByNameArgs};

/// Static description of one tool as advertised to MCP clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub operation: Operation,
    pub description: &'static str,
    pub input_schema: Map<String, Value>,
}

impl ToolDescriptor {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.operation.name()
    }
}

/// The four tools, in catalog order.
#[must_use]
pub fn catalog() -> Vec<ToolDescriptor> {
    Operation::ALL.into_iter().map(describe).collect()
}

fn describe(operation: Operation) -> ToolDescriptor {
    let (description, input_schema) = match operation {
        Operation::SearchFoodByName => (
            "Search for foods by name, synonym, or partial name. Every whitespace-separated \
             term must appear, case-insensitively, in the food name or one of its alternate \
             names. Use this tool when searching by common, brand, or alternate names.",
            derived_schema::<SearchFoodByNameArgs>(),
        ),
        Operation::GetFoods => (
            "Get a paginated list of all available foods. Use this tool when browsing foods \
             or requesting an overview.",
            derived_schema::<GetFoodsArgs>(),
        ),
        Operation::GetFoodById => (
            "Get detailed information for a specific food by its ID. Use this tool when you \
             have a food ID and need complete nutritional data. Returns null if not found.",
            derived_schema::<GetFoodByIdArgs>(),
        ),
        Operation::GetFoodByEan13 => (
            "Look up a food by its EAN-13 barcode. Use this tool when identifying foods from \
             barcodes. Returns null if not found.",
            derived_schema::<GetFoodByEan13Args>(),
        ),
    };
    ToolDescriptor {
        operation,
        description,
        input_schema,
    }
}

/// Derived argument schema without the meta-schema and title keys.
fn derived_schema<T: JsonSchema>() -> Map<String, Value> {
    let mut schema = match serde_json::to_value(schema_for!(T)) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    schema.remove("$schema");
    schema.remove("title");
    schema
        .entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    schema
}

#[cfg(test)]
mod tests {
    use nutrition_core::control::Page;
    use nutrition_store::schema::{EAN13_LEN, FOOD_ID_PREFIX};
    use serde_json::json;

    use super::*;

    #[test]
    fn catalog_lists_the_four_operations_in_order() {
        let names: Vec<&str> = catalog().iter().map(ToolDescriptor::name).collect();
        assert_eq!(
            names,
            vec![
                "search-food-by-name",
                "get-foods",
                "get-food-by-id",
                "get-food-by-ean13"
            ]
        );
    }

    #[test]
    fn schemas_describe_required_arguments_and_constraints() {
        let tools = catalog();

        let search = &tools[0].input_schema;
        assert_eq!(search["type"], json!("object"));
        assert_eq!(search["required"], json!(["query"]));
        assert_eq!(search["properties"]["query"]["minLength"], json!(1));
        assert_eq!(search["properties"]["pageSize"]["default"], json!(Page::DEFAULT_SIZE));
        assert_eq!(search["properties"]["page"]["minimum"], json!(1));
        assert!(search["properties"].get("page_size").is_none());

        let list = &tools[1].input_schema;
        assert!(
            list.get("required")
                .is_none_or(|required| required == &json!([]))
        );
        assert_eq!(list["properties"]["page"]["default"], json!(Page::DEFAULT_NUMBER));

        let by_id = &tools[2].input_schema;
        assert_eq!(by_id["properties"]["id"]["pattern"], json!(format!("^{FOOD_ID_PREFIX}")));
        assert_eq!(by_id["required"], json!(["id"]));

        let by_barcode = &tools[3].input_schema;
        assert_eq!(by_barcode["properties"]["ean_13"]["minLength"], json!(EAN13_LEN));
        assert_eq!(by_barcode["properties"]["ean_13"]["maxLength"], json!(EAN13_LEN));
        assert_eq!(by_barcode["required"], json!(["ean_13"]));
    }

    #[test]
    fn schemas_omit_meta_keys() {
        for tool in catalog() {
            assert!(tool.input_schema.get("$schema").is_none(), "{}", tool.name());
            assert!(tool.input_schema.get("title").is_none(), "{}", tool.name());
        }
    }
}
