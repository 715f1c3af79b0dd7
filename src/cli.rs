// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print JSON lines"),
    )
}

fn req(name: &'static str) -> Arg {
    Arg::new(name).long(name).required(true)
}

fn opt(name: &'static str) -> Arg {
    Arg::new(name).long(name)
}

pub fn build_cli() -> Command {
    Command::new("coinkeep")
        .version(crate_version!())
        .about("Demo custodial multi-currency wallet with admin-approved transfers")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database and seed the currency catalog"))
        .subcommand(
            Command::new("user")
                .about("User accounts")
                .subcommand(
                    Command::new("register")
                        .about("Register a user")
                        .arg(req("name"))
                        .arg(req("email")),
                )
                .subcommand(json_flags(Command::new("list").about("List users")))
                .subcommand(json_flags(
                    Command::new("show").about("Show one user").arg(req("id")),
                ))
                .subcommand(
                    Command::new("balance")
                        .about("Adjust a user balance (admin, delta semantics)")
                        .arg(req("actor"))
                        .arg(req("user"))
                        .arg(req("currency"))
                        .arg(req("delta")),
                )
                .subcommand(
                    Command::new("gen-address")
                        .about("Generate a receive address")
                        .arg(req("user"))
                        .arg(req("currency")),
                )
                .subcommand(
                    Command::new("set-admin")
                        .about("Grant or revoke the admin flag")
                        .arg(req("user"))
                        .arg(
                            Arg::new("revoke")
                                .long("revoke")
                                .action(ArgAction::SetTrue)
                                .help("Revoke instead of grant"),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .about("Update profile fields")
                        .arg(req("user"))
                        .arg(opt("name"))
                        .arg(opt("email")),
                ),
        )
        .subcommand(
            Command::new("kyc")
                .about("Identity verification")
                .subcommand(
                    Command::new("submit")
                        .about("Submit identity data")
                        .arg(req("user"))
                        .arg(req("full-name"))
                        .arg(req("dob"))
                        .arg(req("address"))
                        .arg(
                            req("id-type")
                                .value_parser(["passport", "drivers_license", "national_id"]),
                        )
                        .arg(req("id-number"))
                        .arg(req("front"))
                        .arg(req("back"))
                        .arg(req("selfie")),
                )
                .subcommand(
                    Command::new("approve")
                        .about("Approve a pending submission (admin)")
                        .arg(req("actor"))
                        .arg(req("user")),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a pending submission (admin)")
                        .arg(req("actor"))
                        .arg(req("user"))
                        .arg(req("reason")),
                )
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Show KYC status and record")
                        .arg(req("user")),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Transfers")
                .subcommand(
                    Command::new("send")
                        .about("Create a pending transfer")
                        .arg(req("from"))
                        .arg(req("to"))
                        .arg(req("amount"))
                        .arg(req("currency"))
                        .arg(opt("description"))
                        .arg(opt("from-user")),
                )
                .subcommand(
                    Command::new("approve")
                        .about("Approve a pending transfer (admin)")
                        .arg(req("actor"))
                        .arg(req("id")),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a pending transfer (admin)")
                        .arg(req("actor"))
                        .arg(req("id"))
                        .arg(req("reason")),
                )
                .subcommand(json_flags(
                    Command::new("show").about("Show one transfer").arg(req("id")),
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transfers for a user")
                        .arg(req("user")),
                ))
                .subcommand(json_flags(
                    Command::new("pending").about("List pending transfers"),
                )),
        )
        .subcommand(
            Command::new("currency")
                .about("Currency registry")
                .subcommand(json_flags(Command::new("list").about("List currencies")))
                .subcommand(
                    Command::new("set-rate")
                        .about("Update a USD exchange rate (admin)")
                        .arg(req("actor"))
                        .arg(req("id"))
                        .arg(req("rate")),
                ),
        )
        .subcommand(
            Command::new("notify")
                .about("Notifications")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List notifications for a user")
                        .arg(req("user")),
                ))
                .subcommand(Command::new("read").about("Mark one as read").arg(req("id")))
                .subcommand(
                    Command::new("read-all")
                        .about("Mark all as read")
                        .arg(req("user")),
                )
                .subcommand(
                    Command::new("unread")
                        .about("Show the unread count")
                        .arg(req("user")),
                ),
        )
        .subcommand(
            Command::new("support")
                .about("Support tickets")
                .subcommand(
                    Command::new("open")
                        .about("Open a ticket")
                        .arg(req("user"))
                        .arg(req("subject"))
                        .arg(req("message")),
                )
                .subcommand(
                    Command::new("reply")
                        .about("Reply on a ticket")
                        .arg(req("id"))
                        .arg(req("as").value_parser(["user", "admin"]))
                        .arg(req("message")),
                )
                .subcommand(Command::new("close").about("Close a ticket").arg(req("id")))
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List tickets for a user")
                        .arg(req("user")),
                ))
                .subcommand(json_flags(
                    Command::new("show").about("Show one ticket").arg(req("id")),
                )),
        )
}
