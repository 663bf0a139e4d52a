//! Community administration: membership applications, the regulation and the roster.

use serenity::all::{EditMessage, Member};

use crate::command::argument::to_int;
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture};
use crate::error::command::CommandError;
use crate::error::google::GoogleError;
use crate::literal::format;
use crate::model::application::{Application, ApplicationState};
use crate::model::embed::{ChainedEmbed, SHTELO_YELLOW};
use crate::service::shtelo::{search_paragraphs, ShteloService};

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("가입신청서", applications)
            .aliases(&["가입", "신청서"])
            .check(Check::PartnerOnly)
            .subcommand(Command::new("전체", applications_all).aliases(&["*"]))
            .subcommand(
                Command::new("원본", applications_raw)
                    .subcommand(Command::new("전체", applications_raw_all).aliases(&["*"])),
            )
            .subcommand(
                Command::new("처리", process)
                    .aliases(&["결정"])
                    .usage("<번호> <승인|기각|접수>"),
            ),
        Command::new("회칙", regulation)
            .usage("[키워드]")
            .subcommand(Command::new("전체", regulation_all).aliases(&["*"])),
        Command::new("회의록", meeting_log),
        Command::new("명단", roster).usage("<멤버>").check(Check::PartnerOnly),
    ]
}

/// State named by a processing argument.
pub fn state_by_name(name: &str) -> Option<ApplicationState> {
    match name {
        "승인" | "승인됨" => Some(ApplicationState::Approved),
        "기각" | "기각됨" => Some(ApplicationState::Rejected),
        "접수" | "접수됨" => Some(ApplicationState::Received),
        _ => None,
    }
}

/// Strings a roster row may use to refer to `member`.
pub fn roster_candidates(member: &Member) -> Vec<String> {
    let mut candidates = vec![
        member.user.id.to_string(),
        member.user.name.clone(),
        member.user.tag(),
    ];
    candidates.extend(member.user.global_name.clone());
    candidates.extend(member.nick.clone());
    candidates.dedup();
    candidates
}

/// Embed listing a roster row under the header cells.
pub fn roster_embed(title: &str, keys: &[String], row: &[String]) -> ChainedEmbed {
    let mut embed = ChainedEmbed::new(title).colour(SHTELO_YELLOW);
    for (key, value) in keys.iter().zip(row) {
        if !value.trim().is_empty() {
            embed.add_field(key.as_str(), value.as_str(), true);
        }
    }
    embed
}

#[derive(Clone, Copy)]
enum Listing {
    Summary,
    Raw,
}

/// DMs applications to the author, then reports how many were sent.
async fn send_applications(inv: &Invocation, listing: Listing, all: bool) -> Result<(), CommandError> {
    let literals = inv.literals();
    let text = literals.section("applications");
    let mut message = inv.send(text.get("start")).await?;

    let sheet = ShteloService::new(&inv.state).applications().await?;
    let selected: Vec<&Application> = sheet
        .applications
        .iter()
        .filter(|application| all || application.is_pending())
        .collect();
    for application in &selected {
        let embed = match listing {
            Listing::Summary => application.embed(&literals),
            Listing::Raw => application.raw_embed(&sheet.keys, &literals),
        };
        inv.send_embed_dm(&embed).await?;
    }

    let content = if selected.is_empty() {
        text.get("not_found").to_string()
    } else {
        format(text.get("done"), &[&selected.len()])
    };
    message
        .edit(&inv.ctx, EditMessage::new().content(content))
        .await?;
    Ok(())
}

fn applications(inv: Invocation) -> CommandFuture {
    Box::pin(async move { send_applications(&inv, Listing::Summary, false).await })
}

fn applications_all(inv: Invocation) -> CommandFuture {
    Box::pin(async move { send_applications(&inv, Listing::Summary, true).await })
}

fn applications_raw(inv: Invocation) -> CommandFuture {
    Box::pin(async move { send_applications(&inv, Listing::Raw, false).await })
}

fn applications_raw_all(inv: Invocation) -> CommandFuture {
    Box::pin(async move { send_applications(&inv, Listing::Raw, true).await })
}

fn process(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("application_process");
        let number = to_int(inv.args.required(0, "번호")?)?;
        let decision = inv.args.required(1, "결정")?;
        let Some(state) = state_by_name(decision) else {
            return Err(CommandError::BadArgument(format(text.get("unknown"), &[&decision])));
        };

        let service = ShteloService::new(&inv.state);
        let sheet = service.applications().await?;
        let application = usize::try_from(number)
            .ok()
            .and_then(|number| sheet.get(number))
            .ok_or_else(|| CommandError::Refused(format(text.get("not_found"), &[&number])))?;

        service
            .set_application_state(application.number, state)
            .await?;
        inv.send(format(
            text.get("done"),
            &[&application.number, &state.as_cell()],
        ))
        .await?;
        Ok(())
    })
}

fn regulation(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("regulation");
        let mut message = inv.send(text.get("start")).await?;
        let paragraphs = ShteloService::new(&inv.state).regulation().await?;
        message
            .edit(&inv.ctx, EditMessage::new().content(text.get("done")))
            .await?;

        let keyword = inv.args.rest();
        if keyword.is_empty() {
            if let Some(title) = paragraphs.first() {
                inv.dm(inv.author(), title.as_str()).await?;
            }
            inv.dm(inv.author(), text.get("no_keyword")).await?;
            return Ok(());
        }

        let found = search_paragraphs(&paragraphs, keyword);
        if found.is_empty() {
            inv.dm(inv.author(), format(text.get("not_found"), &[&keyword]))
                .await?;
        }
        for paragraph in found {
            inv.dm(inv.author(), paragraph).await?;
        }
        Ok(())
    })
}

fn regulation_all(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("regulation");
        let mut message = inv.send(text.get("start")).await?;
        let service = ShteloService::new(&inv.state);
        // Read through, so the whole document is current.
        let paragraphs = service.fetch_regulation().await?;
        message
            .edit(&inv.ctx, EditMessage::new().content(text.get("done")))
            .await?;
        for paragraph in paragraphs {
            inv.dm(inv.author(), paragraph).await?;
        }
        Ok(())
    })
}

fn meeting_log(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        inv.send(inv.text("meeting_log", "message")).await?;
        Ok(())
    })
}

fn roster(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("roster");
        let member = inv.member_arg(0, "멤버").await?;

        let entry = match ShteloService::new(&inv.state)
            .roster_entry(&roster_candidates(&member))
            .await
        {
            Ok(entry) => entry,
            Err(GoogleError::NotConfigured(_)) => {
                return Err(CommandError::Refused(text.get("not_configured").to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let Some((keys, row)) = entry else {
            return Err(CommandError::Refused(format(
                text.get("not_found"),
                &[&member.display_name()],
            )));
        };

        let title = format(text.get("title"), &[&member.display_name()]);
        inv.send_embed(&roster_embed(&title, &keys, &row).thumbnail(member.face()))
            .await?;
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use test_utils::serenity::create_test_member;

    #[test]
    fn decisions_map_to_states() {
        assert_eq!(state_by_name("승인"), Some(ApplicationState::Approved));
        assert_eq!(state_by_name("기각됨"), Some(ApplicationState::Rejected));
        assert_eq!(state_by_name("접수"), Some(ApplicationState::Received));
        assert_eq!(state_by_name("보류"), None);
    }

    #[test]
    fn roster_candidates_cover_names_and_id() {
        let member = create_test_member(7, "shtelo", Some("슈텔로"), &[]);
        let candidates = roster_candidates(&member);
        assert!(candidates.contains(&"7".to_string()));
        assert!(candidates.contains(&"shtelo".to_string()));
        assert!(candidates.contains(&"슈텔로".to_string()));
    }

    #[test]
    fn roster_embed_skips_blank_cells() {
        let keys = vec!["닉네임".to_string(), "트위터".to_string(), "가입일".to_string()];
        let row = vec!["켄켄".to_string(), " ".to_string(), "2020-05-01".to_string()];
        let embed = roster_embed("켄켄", &keys, &row);

        let fields = &embed.pages()[0].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "닉네임");
        assert_eq!(fields[1].value, "2020-05-01");
    }
}
