// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn req(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .required(true)
        .help(help)
}

fn opt(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn group_arg() -> Arg {
    req("group", "Group name").short('g')
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print a JSON document"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn export_target(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(group_arg())
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("csv")
                .help("csv | json"),
        )
        .arg(req("out", "Output file"))
}

pub fn build_cli() -> Command {
    command!()
        .name("splitclip")
        .about("Split shared expenses inside a group and work out who pays whom")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("group")
                .about("Manage groups")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Group name"))
                        .arg(opt("currency", "Default expense currency").default_value("USD"))
                        .arg(opt("emoji", "Group emoji")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("show").arg(req("name", "Group name")))
                .subcommand(Command::new("rm").arg(req("name", "Group name"))),
        )
        .subcommand(
            Command::new("member")
                .about("Manage group members")
                .subcommand(
                    Command::new("add")
                        .arg(group_arg())
                        .arg(opt("name", "Display name; omit for a placeholder")),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(group_arg())
                        .arg(req("id", "Member id"))
                        .arg(req("name", "New display name")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(group_arg())
                        .arg(req("id", "Member id")),
                )
                .subcommand(Command::new("list").arg(group_arg())),
        )
        .subcommand(
            Command::new("expense")
                .about("Log and review shared expenses")
                .subcommand(
                    Command::new("add")
                        .arg(group_arg())
                        .arg(req("amount", "Positive amount").allow_negative_numbers(true))
                        .arg(req("paid-by", "Name of the member who paid"))
                        .arg(req("description", "What it was for"))
                        .arg(opt("currency", "Currency code (default: group currency)"))
                        .arg(opt("category", "Expense category (default: Other)")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(group_arg()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(group_arg())
                        .arg(req("id", "Expense id")),
                ),
        )
        .subcommand(json_flags(
            Command::new("balances")
                .about("Net balance per member")
                .arg(group_arg()),
        ))
        .subcommand(json_flags(
            Command::new("settle")
                .about("Transfers that settle every balance")
                .arg(group_arg()),
        ))
        .subcommand(
            Command::new("currency")
                .about("Display currencies and conversion rates")
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("set")
                        .arg(req("code", "Three-letter code"))
                        .arg(req("symbol", "Display symbol"))
                        .arg(req("rate", "Units per one base unit")),
                )
                .subcommand(Command::new("rm").arg(req("code", "Three-letter code")))
                .subcommand(
                    Command::new("convert")
                        .arg(req("amount", "Amount"))
                        .arg(req("from", "Source currency"))
                        .arg(req("to", "Target currency")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write expenses or settlements to a file")
                .subcommand(export_target("expenses", "Export a group's expenses"))
                .subcommand(export_target("settlements", "Export a group's settle-up plan")),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check groups for data that skews balances")
                .arg(opt("group", "Only check this group").short('g')),
        )
}
