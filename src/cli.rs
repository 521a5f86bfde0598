// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("month").long("month").help("Reporting month YYYY-MM"))
        .arg(Arg::new("from").long("from").help("Window start YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").help("Window end YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("brokerbook")
        .about("Office bookkeeping for a two-partner real-estate brokerage")
        .version(clap::crate_version!())
        .arg(
            Arg::new("actor")
                .long("actor")
                .global(true)
                .default_value("office")
                .help("Name recorded in the audit trail for mutations"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("config")
                .about("Office-level settings")
                .subcommand(
                    Command::new("set-partners")
                        .about("Set partner display names")
                        .arg(Arg::new("a").long("a").required(true).help("Partner A display name"))
                        .arg(Arg::new("b").long("b").required(true).help("Partner B display name")),
                ),
        )
        .subcommand(
            Command::new("consultant")
                .about("Manage consultants")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("phone").long("phone").default_value(""))
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .required(true)
                                .help("Commission rate percent, 0-100"),
                        )
                        .arg(
                            Arg::new("start-date")
                                .long("start-date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("set-rate")
                        .about("Change a consultant's rate (future transactions only)")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rate").long("rate").required(true)),
                )
                .subcommand(
                    Command::new("deactivate")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage sale/rental transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("property").long("property").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("sale or rent"),
                        )
                        .arg(Arg::new("customer").long("customer").default_value(""))
                        .arg(
                            Arg::new("customer-phone")
                                .long("customer-phone")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new("consultant")
                                .long("consultant")
                                .required(true)
                                .help("Consultant full name"),
                        )
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("revenue")
                                .long("revenue")
                                .required(true)
                                .help("Gross revenue"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("consultant").long("consultant"))
                        .arg(Arg::new("status").long("status").help("pending or paid"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit descriptive fields; revenue and shares are frozen")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("property").long("property"))
                        .arg(Arg::new("customer").long("customer"))
                        .arg(Arg::new("customer-phone").long("customer-phone"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("confirm-payment")
                        .about("Settle a pending transaction and book the commission payout")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage office expenses")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("rent|supplies|marketing|payroll|utilities|food|other"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("paid-by")
                                .long("paid-by")
                                .required(true)
                                .help("partner-a|partner-b|office"),
                        )
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(Arg::new("vendor").long("vendor").help("Vendor name"))
                        .arg(Arg::new("notes").long("notes"))
                        .arg(
                            Arg::new("paid")
                                .long("paid")
                                .action(ArgAction::SetTrue)
                                .help("Mark as already paid"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("category").long("category")),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a manually entered expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("paid-by").long("paid-by"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("notes").long("notes"))
                        .arg(Arg::new("paid").long("paid").help("true or false")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("vendor")
                .about("Vendor registry and unpaid-balance ledger")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("contact").long("contact"))
                        .arg(Arg::new("phone").long("phone").default_value(""))
                        .arg(Arg::new("category").long("category").default_value("other"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("personnel")
                .about("Manage office staff")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("role").long("role").default_value(""))
                        .arg(Arg::new("salary").long("salary").required(true))
                        .arg(
                            Arg::new("start-date")
                                .long("start-date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("salary")
                .about("Salary payments (also booked as payroll expenses)")
                .subcommand(
                    Command::new("pay")
                        .arg(
                            Arg::new("personnel")
                                .long("personnel")
                                .required(true)
                                .help("Personnel full name"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .required(true)
                                .help("Salary period YYYY-MM"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("period").long("period")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Period reports over an explicit date window")
                .subcommand(json_flags(period_args(Command::new("summary"))))
                .subcommand(json_flags(period_args(Command::new("partners"))))
                .subcommand(json_flags(period_args(Command::new("consultants"))))
                .subcommand(json_flags(period_args(Command::new("portfolio")))),
        )
        .subcommand(
            Command::new("log")
                .about("Audit trail")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("module").long("module"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export books to CSV or JSON")
                .arg(
                    Arg::new("what")
                        .long("what")
                        .required(true)
                        .help("transactions or expenses"),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("doctor")
                .about("Reconcile settled transactions against payout expenses"),
        )
}
