// src/search/prompt.rs
//
// System prompt for turning a free-text search into a StructuredFilter.
// Built once at startup from the catalog; nothing here is computed per query.

use crate::domain::catalog::{ListingTable, FEW_SHOTS, NEIGHBORHOODS, THEMES};
use crate::domain::filter::{Borough, MustHave, RENT_BUDGET_CEILING};

pub fn build_system_prompt() -> String {
    let mut prompt = String::with_capacity(8 * 1024);

    prompt.push_str(
        "You convert New York City apartment searches into JSON filters for a \
         database of undervalued listings.\n\n",
    );

    prompt.push_str("## Tables\n");
    for table in ListingTable::ALL {
        let schema = table.schema();
        prompt.push_str(&format!(
            "\n### {} ({}): {}\n",
            schema.name,
            schema.table.property_type().as_str(),
            schema.description
        ));
        for column in schema.columns {
            prompt.push_str(&format!(
                "- {} ({}): {}\n",
                column.name, column.sql_type, column.meaning
            ));
        }
    }

    prompt.push_str("\n## Output format\n");
    prompt.push_str(
        "Respond with ONLY one JSON object, no markdown and no explanation, \
         with these keys:\n\
         - \"property_type\": \"rent\" or \"buy\"; omit if the user did not say\n\
         - \"max_budget\": number; monthly rent or total price\n\
         - \"bedrooms\": integer; 0 means studio\n\
         - \"neighborhoods\": array of neighborhood names\n\
         - \"boroughs\": array of borough names\n\
         - \"must_haves\": array of feature tokens\n\
         - \"discount_threshold\": number 0-100; minimum percent below market\n\
         - \"interpretation\": short plain-English summary of the search (always required)\n",
    );

    prompt.push_str("\n## Rules\n");
    prompt.push_str(&format!(
        "- If no budget is mentioned, leave out \"max_budget\" entirely. Never use 0 or null.\n\
         - A budget under {ceiling} is a monthly rent: use \"rent\".\n\
         - A budget of {ceiling} or more is a purchase price: use \"buy\".\n\
         - \"$4k\" means 4000 and \"1.2M\" means 1200000.\n\
         - Boroughs must be one of: {boroughs}.\n\
         - Only use neighborhood names from the list below.\n\
         - Only use must-have tokens from the list below.\n\
         - \"Deals\", \"undervalued\" or \"below market\" with a percent sets \"discount_threshold\".\n",
        ceiling = RENT_BUDGET_CEILING as u64,
        boroughs = Borough::ALL
            .iter()
            .map(|b| b.name())
            .collect::<Vec<_>>()
            .join(", "),
    ));

    prompt.push_str("\n## Neighborhoods\n");
    for (borough, names) in NEIGHBORHOODS {
        prompt.push_str(&format!("- {}: {}\n", borough.name(), names.join(", ")));
    }

    prompt.push_str("\n## Must-have tokens\n");
    for token in MustHave::ALL {
        let synonyms: Vec<&str> = token.synonyms().collect();
        if synonyms.is_empty() {
            prompt.push_str(&format!("- {}\n", token.token()));
        } else {
            prompt.push_str(&format!(
                "- {} (also: {})\n",
                token.token(),
                synonyms.join(", ")
            ));
        }
    }

    prompt.push_str("\n## Vague areas\nMap these phrases to exactly these neighborhoods:\n");
    for theme in THEMES {
        prompt.push_str(&format!(
            "- {}: {}\n",
            theme.phrases.join(" / "),
            theme.neighborhoods.join(", ")
        ));
    }

    prompt.push_str("\n## Examples\n");
    for example in FEW_SHOTS {
        prompt.push_str(&format!(
            "Query: {}\nJSON: {}\n\n",
            example.query, example.filter_json
        ));
    }

    prompt
}
