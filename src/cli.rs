// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help(binary_name: &str) {
    println!(
        "Dinehall v{} - Dining hall menu browser and meal planner",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} menu [hall] [period]             Show a hall's menu", binary_name);
    println!("    {} periods [hall]                   List the hall's serving periods today", binary_name);
    println!("    {} day [date]                       Show the meal plan for a day", binary_name);
    println!("    {} week [date]                      Show the week summary around a date", binary_name);
    println!("    {} add <menu-item-id>               Add a menu item to the plan", binary_name);
    println!("    {} servings <item-id> <up|down>     Step a plan item by a quarter serving", binary_name);
    println!("    {} remove <item-id>                 Remove an item from the plan", binary_name);
    println!("    {} goals [--calories N] [--protein N] [--carbs N] [--fat N]", binary_name);
    println!("    {} --help                           Show this help message", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config.");
    println!("    --search <text>       Filter menu items by name, description or ingredients.");
    println!("    --exclude <a,b,..>    Hide items carrying any of these allergens.");
    println!("    --include <a,b,..>    Show only items carrying one of these allergens.");
    println!("    --date <yyyy-mm-dd>   Target date for add (defaults to today).");
    println!("    --meal <bucket>       breakfast|lunch|dinner|snack; required when the");
    println!("                          serving period is ambiguous (e.g. an all-day station).");
    println!("    --period <label>      Serving period the item came from; used to infer the");
    println!("                          meal for add when --meal is not given.");
    println!("    --servings <n>        Initial serving quantity for add (defaults to 1).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} menu ohill Lunch --exclude Milk,Eggs", binary_name);
    println!("    {} menu runk --search chicken", binary_name);
    println!("    {} day 2025-03-10", binary_name);
    println!("    {} add 4821 --meal dinner --servings 1.5", binary_name);
    println!("    {} goals --calories 2200 --protein 160", binary_name);
    println!();
    println!("Plan commands need an auth_token in the config file; browsing does not.");
}
