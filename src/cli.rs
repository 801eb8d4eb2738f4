// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn with_json(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD"))
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .required(required)
        .help("INCOME | EXPENSE | INVESTMENT")
}

fn transaction_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("category_id")
            .long("category-id")
            .required(required)
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true)
            .help("e.g. 450000.00 or $450,000.00"),
    )
    .arg(kind_arg(required))
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
    .arg(Arg::new("description").long("description"))
    .arg(
        Arg::new("recurring")
            .long("recurring")
            .help("DAILY | WEEKLY | MONTHLY | YEARLY"),
    )
}

pub fn build_cli() -> Command {
    Command::new("finclip")
        .version(crate_version!())
        .about("Personal finance tracker: categories, transactions, budgets, investments, reports")
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .help("Act as this user (default: the one chosen with `user use`)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Register and select users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("use").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(kind_arg(true))
                        .arg(Arg::new("color").long("color").help("#RRGGBB"))
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("budget_limit").long("budget-limit"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(with_json(Command::new("list").arg(kind_arg(false))))
                .subcommand(Command::new("rm").arg(id_arg("Category id"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(transaction_fields(Command::new("add"), true))
                .subcommand(with_json(range_args(
                    Command::new("list")
                        .arg(kind_arg(false))
                        .arg(
                            Arg::new("category_id")
                                .long("category-id")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )))
                .subcommand(
                    transaction_fields(Command::new("edit").arg(id_arg("Transaction id")), false)
                        .arg(
                            Arg::new("no_recurring")
                                .long("no-recurring")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("recurring"),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg("Transaction id"))),
        )
        .subcommand(
            Command::new("investment")
                .about("Track investments")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("STOCK | BOND | REAL_ESTATE | CRYPTO | SAVINGS | OTHER"),
                        )
                        .arg(Arg::new("initial").long("initial").required(true))
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("start_date").long("start-date"))
                        .arg(
                            Arg::new("expected_return")
                                .long("expected-return")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Expected yearly return in percent"),
                        )
                        .arg(
                            Arg::new("risk")
                                .long("risk")
                                .required(true)
                                .help("LOW | MEDIUM | HIGH"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(with_json(
                    Command::new("list").arg(
                        Arg::new("active")
                            .long("active")
                            .action(ArgAction::SetTrue)
                            .help("Only active investments"),
                    ),
                ))
                .subcommand(
                    Command::new("update")
                        .arg(id_arg("Investment id"))
                        .arg(Arg::new("current_value").long("current-value"))
                        .arg(
                            Arg::new("active")
                                .long("active")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg("Investment id"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets per category")
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("category_id")
                                .long("category-id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(with_json(
                    Command::new("list").arg(Arg::new("month").long("month").help("YYYY-MM")),
                ))
                .subcommand(
                    Command::new("refresh")
                        .about("Recompute spent amounts from expense transactions")
                        .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated reports")
                .subcommand(with_json(range_args(Command::new("monthly").arg(
                    Arg::new("chart")
                        .long("chart")
                        .action(ArgAction::SetTrue)
                        .help("Emit float chart rows"),
                ))))
                .subcommand(with_json(range_args(
                    Command::new("by-category").arg(kind_arg(false)).arg(
                        Arg::new("chart")
                            .long("chart")
                            .action(ArgAction::SetTrue)
                            .help("Emit float chart rows"),
                    ),
                )))
                .subcommand(with_json(
                    Command::new("dashboard").arg(Arg::new("date").long("date")),
                ))
                .subcommand(Command::new("chart").arg(Arg::new("date").long("date"))),
        )
}
