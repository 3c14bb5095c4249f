use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use dinehall::client::ApiClient;
use dinehall::config::Config;
use dinehall::context::StandardContext;
use dinehall::model::filter::{AllergenMode, MenuFilter};
use dinehall::model::menu::{DayMenu, MenuItem};
use dinehall::model::nutrition::{self, DailyProgress};
use dinehall::model::period::resolve_bucket;
use dinehall::model::plan::{GoalsUpdate, MealBucket};
use dinehall::store::{self, PlanStore, StepDirection};
use dinehall::week::{format_range, week_window};
use dinehall::{cli, model::menu::display_numeric};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = TermLogger::init(
        LevelFilter::Warn,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" || args[1] == "help" {
        cli::print_help("dinehall");
        return Ok(());
    }

    let override_root = flag_value(&args, "--root")
        .or_else(|| flag_value(&args, "-r"))
        .map(PathBuf::from);
    let ctx = StandardContext::new(override_root);
    let config = Config::load_or_default(&ctx)?;
    let client = ApiClient::from_config(&config)?;

    match args[1].as_str() {
        "menu" => cmd_menu(&client, &config, &args).await,
        "periods" => cmd_periods(&client, &config, &args).await,
        "day" => cmd_day(&client, &args).await,
        "week" => cmd_week(&client, &args).await,
        "add" => cmd_add(&client, &args).await,
        "servings" => cmd_servings(&client, &args).await,
        "remove" => cmd_remove(&client, &args).await,
        "goals" => cmd_goals(&client, &args).await,
        other => {
            eprintln!("Unknown command: {}", other);
            cli::print_help("dinehall");
            Ok(())
        }
    }
}

/// Value of `--flag <value>` anywhere in the argument list.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Positional arguments of a subcommand, i.e. everything after the command
/// name that is not a flag or a flag's value.
fn positionals(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in &args[2..] {
        if skip {
            skip = false;
            continue;
        }
        if arg.starts_with('-') {
            skip = true;
            continue;
        }
        out.push(arg);
    }
    out
}

fn parse_date_arg(raw: Option<&String>) -> Result<NaiveDate> {
    match raw {
        Some(s) => s
            .parse::<NaiveDate>()
            .map_err(|_| anyhow!("Invalid date '{}', expected yyyy-mm-dd", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn allergen_set(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

async fn cmd_menu(client: &ApiClient, config: &Config, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let hall = pos
        .first()
        .map(|s| s.as_str())
        .unwrap_or(config.default_hall.as_str());
    let period = pos.get(1).map(|s| s.as_str()).unwrap_or("Lunch");

    let filter = build_filter(args)?;

    let mut store = PlanStore::new();
    store.begin_menu_fetch(hall, period);
    let menu = client.menu_info(hall, period).await?;
    store.apply_menu(menu);
    let Some(menu) = &store.menu else {
        return Ok(());
    };

    print_menu(menu, &filter);
    Ok(())
}

fn build_filter(args: &[String]) -> Result<MenuFilter> {
    let search = flag_value(args, "--search").unwrap_or_default();
    let exclude = flag_value(args, "--exclude");
    let include = flag_value(args, "--include");
    if exclude.is_some() && include.is_some() {
        return Err(anyhow!("--exclude and --include cannot be combined"));
    }
    let (allergens, mode) = match (exclude, include) {
        (Some(raw), None) => (allergen_set(&raw), AllergenMode::Exclude),
        (None, Some(raw)) => (allergen_set(&raw), AllergenMode::Include),
        _ => (HashSet::new(), AllergenMode::Exclude),
    };
    Ok(MenuFilter::new(search, allergens, mode))
}

fn print_menu(menu: &DayMenu, filter: &MenuFilter) {
    println!(
        "{} - {} ({}) - {}",
        menu.dining_hall, menu.period.name, menu.day_name, menu.date
    );
    if !menu.hall_hours.open_time.is_empty() {
        println!("Hours: {} - {}", menu.hall_hours.open_time, menu.hall_hours.close_time);
    }

    let stations = filter.filter_stations(&menu.period.stations);
    if !filter.is_empty() {
        println!("Found {} items", filter.match_count(&menu.period.stations));
    }
    if stations.is_empty() {
        println!("No items to show.");
        return;
    }

    for station in &stations {
        println!();
        println!("== {} ==", station.name);
        let mains = station.main_items();
        if !mains.is_empty() {
            for item in mains {
                print_item(item, "  ");
            }
        }
        let sides = station.sides();
        if !sides.is_empty() {
            println!("  Sides:");
            for item in sides {
                print_item(item, "    ");
            }
        }
    }
}

fn print_item(item: &MenuItem, indent: &str) {
    let nutrition = item.nutrition_info.as_ref();
    println!(
        "{}{} ({} cal, {} g protein)",
        indent,
        item.item_name,
        display_numeric(nutrition.and_then(|n| n.calories.as_deref())),
        display_numeric(nutrition.and_then(|n| n.protein.as_deref())),
    );
    let allergens = item.allergen_display();
    if !allergens.is_empty() {
        println!("{}  allergens: {}", indent, allergens.join(", "));
    }
}

async fn cmd_periods(client: &ApiClient, config: &Config, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let hall = pos
        .first()
        .map(|s| s.as_str())
        .unwrap_or(config.default_hall.as_str());

    let available = client.available_periods(hall).await?;
    if available.periods.is_empty() {
        println!("{} is closed today.", hall);
        return Ok(());
    }
    println!("Serving periods at {}:", hall);
    for period in &available.periods {
        println!("  {} ({})", period.name, period.key);
    }
    Ok(())
}

async fn cmd_day(client: &ApiClient, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let date = parse_date_arg(pos.first().copied())?;

    let mut store = PlanStore::new();
    store.select_date(date);
    store.apply_daily(client.daily_plan(date).await?);
    let Some(daily) = &store.daily else {
        return Ok(());
    };

    println!("Plan for {}", daily.date);
    for bucket in MealBucket::ALL {
        let items = daily.meals.bucket(bucket);
        if items.is_empty() {
            continue;
        }
        println!();
        println!(
            "{} ({} cal)",
            bucket.label(),
            nutrition::bucket_calories(items).round()
        );
        for item in items {
            let pending = if store.is_pending(item.id) { " *" } else { "" };
            println!(
                "  [{}] {} x{} - {} cal{}",
                item.id,
                item.menu_item_name,
                item.servings,
                item.total_calories.round(),
                pending
            );
        }
    }

    println!();
    print_progress(&nutrition::plan_progress(daily));
    Ok(())
}

fn print_progress(progress: &DailyProgress) {
    let row = |name: &str, m: &dinehall::model::nutrition::MetricProgress| {
        println!(
            "  {:<9} {:>6} / {:<6} {:>3}%",
            name,
            m.current.round(),
            m.goal.round(),
            m.percentage
        );
    };
    println!("Progress:");
    row("calories", &progress.calories);
    row("protein", &progress.protein);
    row("carbs", &progress.carbs);
    row("fat", &progress.fat);
}

async fn cmd_week(client: &ApiClient, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let date = parse_date_arg(pos.first().copied())?;

    let mut store = PlanStore::new();
    store.select_date(date);
    store.apply_week(client.week_plan(date).await?);
    let Some(week) = &store.week else {
        return Ok(());
    };

    let window = week_window(date);
    println!("Week of {}", format_range(&window));
    for day in &window {
        let summary = week.week_summary.iter().find(|s| s.date == *day);
        match summary {
            Some(s) if s.has_meals => println!(
                "  {}  {:>5} cal  {} meals",
                day,
                s.total_calories.round(),
                s.meal_count
            ),
            _ => println!("  {}  --", day),
        }
    }
    Ok(())
}

async fn cmd_add(client: &ApiClient, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let menu_item_id: i64 = pos
        .first()
        .ok_or_else(|| anyhow!("add needs a menu item id"))?
        .parse()
        .map_err(|_| anyhow!("Invalid menu item id"))?;

    let date = parse_date_arg(flag_value(args, "--date").as_ref())?;
    let choice = match flag_value(args, "--meal") {
        Some(raw) => Some(parse_bucket(&raw)?),
        None => None,
    };
    let period_label = flag_value(args, "--period").unwrap_or_default();
    let servings = match flag_value(args, "--servings") {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| anyhow!("Invalid serving quantity '{}'", raw))?,
        ),
        None => None,
    };

    let Some(bucket) = resolve_bucket(&period_label, choice) else {
        return Err(anyhow!(
            "Cannot tell which meal this period belongs to; pass --meal breakfast|lunch|dinner|snack"
        ));
    };

    let mut store = PlanStore::new();
    store.select_date(date);
    let created = store::add_to_plan(client, &mut store, date, menu_item_id, bucket, servings).await?;
    println!(
        "Added {} to {} on {} ({} cal)",
        created.menu_item_name,
        created.meal_type.label(),
        date,
        created.total_calories.round()
    );
    Ok(())
}

fn parse_bucket(raw: &str) -> Result<MealBucket> {
    match raw.to_lowercase().as_str() {
        "breakfast" => Ok(MealBucket::Breakfast),
        "lunch" => Ok(MealBucket::Lunch),
        "dinner" => Ok(MealBucket::Dinner),
        "snack" => Ok(MealBucket::Snack),
        other => Err(anyhow!("Unknown meal '{}'", other)),
    }
}

async fn cmd_servings(client: &ApiClient, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let id: i64 = pos
        .first()
        .ok_or_else(|| anyhow!("servings needs an item id"))?
        .parse()
        .map_err(|_| anyhow!("Invalid item id"))?;
    let direction = match pos.get(1).map(|s| s.as_str()) {
        Some("up") => StepDirection::Increment,
        Some("down") => StepDirection::Decrement,
        _ => return Err(anyhow!("servings needs a direction: up or down")),
    };
    let date = parse_date_arg(flag_value(args, "--date").as_ref())?;

    let mut store = PlanStore::new();
    store.select_date(date);
    store.apply_daily(client.daily_plan(date).await?);

    match store::commit_servings(client, &mut store, id, direction).await? {
        Some(servings) => println!("Item {} is now {} servings", id, servings),
        None => println!("Nothing to do for item {}", id),
    }
    Ok(())
}

async fn cmd_remove(client: &ApiClient, args: &[String]) -> Result<()> {
    let pos = positionals(args);
    let id: i64 = pos
        .first()
        .ok_or_else(|| anyhow!("remove needs an item id"))?
        .parse()
        .map_err(|_| anyhow!("Invalid item id"))?;
    let date = parse_date_arg(flag_value(args, "--date").as_ref())?;

    let mut store = PlanStore::new();
    store.select_date(date);
    store.apply_daily(client.daily_plan(date).await?);

    if store::commit_delete(client, &mut store, id).await? {
        println!("Removed item {}", id);
    } else {
        println!("No item {} in the plan for {}", id, date);
    }
    Ok(())
}

async fn cmd_goals(client: &ApiClient, args: &[String]) -> Result<()> {
    let date = parse_date_arg(flag_value(args, "--date").as_ref())?;
    let parse_goal = |flag: &str| -> Result<Option<f64>> {
        match flag_value(args, flag) {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| anyhow!("Invalid number for {}", flag)),
            None => Ok(None),
        }
    };

    let update = GoalsUpdate {
        daily_calorie_goal: parse_goal("--calories")?,
        daily_protein_goal: parse_goal("--protein")?,
        daily_carbs_goal: parse_goal("--carbs")?,
        daily_fat_goal: parse_goal("--fat")?,
    };

    let week = client.update_goals(date, &update).await?;
    let goals = week.goals();
    println!("Goals for the week of {}:", week.week_start_date);
    let show = |name: &str, value: Option<f64>, fallback: f64| {
        match value {
            Some(v) => println!("  {:<9} {}", name, v),
            None => println!("  {:<9} {} (default)", name, fallback),
        }
    };
    show("calories", goals.calories, nutrition::DEFAULT_CALORIE_GOAL);
    show("protein", goals.protein, nutrition::DEFAULT_PROTEIN_GOAL);
    show("carbs", goals.carbs, nutrition::DEFAULT_CARBS_GOAL);
    show("fat", goals.fat, nutrition::DEFAULT_FAT_GOAL);
    Ok(())
}
