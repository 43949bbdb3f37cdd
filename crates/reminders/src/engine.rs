//! Daily reminder decisions.
//!
//! Given "today" and a snapshot, decide which reminders fire and render the
//! composite message. Pure: the same inputs always give the same output.

use chrono::NaiveDate;

use reviewbot_core::{ReviewEvent, Snapshot};
use reviewbot_notify::PingBuilder;

/// A reminder condition that fired for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reminder {
    /// Email date reached and the email isn't marked sent.
    EmailDue,
    /// Publicity date reached and publicity isn't marked done.
    PublicityDue,
    /// Event is tomorrow.
    Tomorrow,
    /// Event is today.
    Today,
}

/// Conditions that fire for `event` on `today`, in message order.
///
/// At most one of [`Reminder::Tomorrow`] and [`Reminder::Today`] fires.
pub fn triggered(event: &ReviewEvent, today: NaiveDate) -> Vec<Reminder> {
    let mut out = Vec::new();

    if event.email_date.is_some_and(|d| d <= today) && !event.email_done.unwrap_or(false) {
        out.push(Reminder::EmailDue);
    }
    if event.publicity_date.is_some_and(|d| d <= today) && !event.publicity_done.unwrap_or(false) {
        out.push(Reminder::PublicityDue);
    }
    if let Some(date) = event.event_date {
        if today.succ_opt() == Some(date) {
            out.push(Reminder::Tomorrow);
        } else if date == today {
            out.push(Reminder::Today);
        }
    }

    out
}

fn professor_contact(event: &ReviewEvent) -> String {
    let prof = &event.professor;
    match (prof.name.is_empty(), prof.email.is_empty()) {
        (false, false) => format!("{} ({})", prof.name, prof.email),
        (false, true) => prof.name.clone(),
        (true, false) => prof.email.clone(),
        (true, true) => "the professor".to_string(),
    }
}

/// One message line. Email and publicity lines ping lead hosts only; event
/// lines ping every host list, duplicates included.
pub fn render_line(event: &ReviewEvent, reminder: Reminder, pings: &PingBuilder) -> String {
    let line = match reminder {
        Reminder::EmailDue => format!(
            "{} - Email to {} due! {}",
            event.name,
            professor_contact(event),
            pings.pings(event.lead_hosts.iter().map(String::as_str)),
        ),
        Reminder::PublicityDue => format!(
            "{} - Publicity due! {}",
            event.name,
            pings.pings(event.lead_hosts.iter().map(String::as_str)),
        ),
        Reminder::Tomorrow => format!("{} is tomorrow! {}", event.name, pings.pings(event.all_hosts())),
        Reminder::Today => format!("{} is today! {}", event.name, pings.pings(event.all_hosts())),
    };
    line.trim_end().to_string()
}

/// Header line naming the day, e.g. `Reminders for Monday, October 19, 2026`.
pub fn header(today: NaiveDate) -> String {
    format!("Reminders for {}", today.format("%A, %B %-d, %Y"))
}

/// Whether any record fires on `today`. Needs no roster.
pub fn any_due(snapshot: &Snapshot, today: NaiveDate) -> bool {
    snapshot.values().any(|event| !triggered(event, today).is_empty())
}

/// The day's reminder message, or `None` when nothing fired.
///
/// Lines follow snapshot order, then condition order within a record.
pub fn build_reminder(today: NaiveDate, snapshot: &Snapshot, pings: &PingBuilder) -> Option<String> {
    let lines: Vec<String> = snapshot
        .values()
        .flat_map(|event| {
            triggered(event, today)
                .into_iter()
                .map(move |reminder| render_line(event, reminder, pings))
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut message = header(today);
    for line in lines {
        message.push('\n');
        message.push_str(&line);
    }
    Some(message)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use reviewbot_core::Professor;
    use reviewbot_notify::Member;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn event(name: &str) -> ReviewEvent {
        ReviewEvent {
            name: name.to_string(),
            professor: Professor {
                name: "Dr. Smith".to_string(),
                email: "smith@uni.edu".to_string(),
            },
            ..Default::default()
        }
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot(events: Vec<ReviewEvent>) -> Snapshot {
        events.into_iter().map(|e| (e.name.clone(), e)).collect()
    }

    fn pings() -> PingBuilder {
        PingBuilder::new(vec![Member::new("1", "Alice"), Member::new("2", "Carl")])
    }

    #[test]
    fn overdue_email_fires_once() {
        let mut e = event("Calc");
        e.email_date = Some(today() - Duration::days(1));
        e.email_done = Some(false);
        assert_eq!(triggered(&e, today()), vec![Reminder::EmailDue]);
    }

    #[test]
    fn sent_email_does_not_fire() {
        let mut e = event("Calc");
        e.email_date = Some(today() - Duration::days(1));
        e.email_done = Some(true);
        assert!(triggered(&e, today()).is_empty());
    }

    #[test]
    fn future_email_does_not_fire() {
        let mut e = event("Calc");
        e.email_date = Some(today() + Duration::days(1));
        assert!(triggered(&e, today()).is_empty());
    }

    #[test]
    fn publicity_due_today_fires_with_absent_flag() {
        let mut e = event("Calc");
        e.publicity_date = Some(today());
        e.publicity_done = None;
        assert_eq!(triggered(&e, today()), vec![Reminder::PublicityDue]);
    }

    #[test]
    fn event_tomorrow_or_today_or_neither() {
        let mut e = event("Calc");
        e.event_date = Some(today() + Duration::days(1));
        assert_eq!(triggered(&e, today()), vec![Reminder::Tomorrow]);

        e.event_date = Some(today());
        assert_eq!(triggered(&e, today()), vec![Reminder::Today]);

        e.event_date = Some(today() + Duration::days(2));
        assert!(triggered(&e, today()).is_empty());

        e.event_date = Some(today() - Duration::days(1));
        assert!(triggered(&e, today()).is_empty());
    }

    #[test]
    fn record_can_fire_all_kinds_in_order() {
        let mut e = event("Calc");
        e.email_date = Some(today());
        e.publicity_date = Some(today());
        e.event_date = Some(today());
        assert_eq!(
            triggered(&e, today()),
            vec![Reminder::EmailDue, Reminder::PublicityDue, Reminder::Today]
        );
    }

    #[test]
    fn tomorrow_line_pings_every_host_list() {
        let mut e = event("Calc");
        e.event_date = Some(today() + Duration::days(1));
        e.lead_hosts = strings(&["Al"]);
        e.hosts = strings(&["Zed"]);
        e.backup_hosts = strings(&["carl", "al"]);

        let message = build_reminder(today(), &snapshot(vec![e]), &pings()).unwrap();
        assert_eq!(
            message,
            "Reminders for Monday, October 19, 2026\nCalc is tomorrow! <@1> @Zed <@2> <@1>"
        );
    }

    #[test]
    fn email_line_names_professor_and_pings_leads_only() {
        let mut e = event("Calc");
        e.email_date = Some(today());
        e.lead_hosts = strings(&["Alice"]);
        e.hosts = strings(&["Carl"]);

        let line = render_line(&e, Reminder::EmailDue, &pings());
        assert_eq!(line, "Calc - Email to Dr. Smith (smith@uni.edu) due! <@1>");
    }

    #[test]
    fn line_without_hosts_has_no_trailing_space() {
        let e = event("Calc");
        assert_eq!(render_line(&e, Reminder::PublicityDue, &pings()), "Calc - Publicity due!");
    }

    #[test]
    fn nothing_due_is_none() {
        let mut e = event("Calc");
        e.event_date = Some(today() + Duration::days(7));
        assert!(build_reminder(today(), &snapshot(vec![e]), &pings()).is_none());
        assert!(build_reminder(today(), &Snapshot::new(), &pings()).is_none());
    }

    #[test]
    fn any_due_only_when_a_record_fires() {
        let mut quiet = event("Stats");
        quiet.event_date = Some(today() + Duration::days(7));
        let mut due = event("Calc");
        due.event_date = Some(today());

        assert!(!any_due(&snapshot(vec![quiet.clone()]), today()));
        assert!(any_due(&snapshot(vec![quiet, due]), today()));
    }

    #[test]
    fn same_inputs_same_output() {
        let mut e = event("Calc");
        e.email_date = Some(today());
        e.lead_hosts = strings(&["Alice"]);
        let snap = snapshot(vec![e]);
        assert_eq!(
            build_reminder(today(), &snap, &pings()),
            build_reminder(today(), &snap, &pings())
        );
    }

    #[test]
    fn header_formats_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(header(day), "Reminders for Thursday, March 5, 2026");
    }
}
