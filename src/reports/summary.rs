//! Group Summary Report
//!
//! The dashboard view: what the group spent, what each member paid and
//! bears, and where the active user stands.

use std::io::Write;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, net_balance, NetPosition};
use crate::models::{Money, User, UserId};
use crate::services::{BalanceService, UserService};
use crate::storage::Storage;

/// One member's line in the summary
#[derive(Debug, Clone)]
pub struct MemberSummary {
    pub user_id: UserId,
    pub name: String,
    /// Total of expenses this member paid for
    pub paid: Money,
    /// This member's portion of group spending
    pub share: Money,
    /// Income recorded against this member
    pub income: Money,
    pub net: Money,
    pub position: NetPosition,
}

/// Group Summary Report
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub total_group_expenses: Money,
    pub expense_count: usize,
    pub members: Vec<MemberSummary>,
    /// Perspective user, if any users exist
    pub active_user: Option<UserId>,
    pub currency_symbol: String,
}

impl SummaryReport {
    /// Generate the summary from the current store
    pub fn generate(storage: &Storage) -> LedgerResult<Self> {
        let settings = Settings::load_or_create(storage.paths())?;
        let active = UserService::new(storage).active()?;
        let sheet = BalanceService::new(storage).balances()?;

        let users = storage.users.get_all()?;
        let expenses = storage.expenses.get_all()?;

        let members = users
            .into_iter()
            .map(|User { id, name, .. }| -> LedgerResult<MemberSummary> {
                let net = net_balance(&sheet, &id);
                Ok(MemberSummary {
                    paid: ledger::total_paid(&expenses, &id)?,
                    share: ledger::user_share(&expenses, &id)?,
                    income: ledger::total_income(&expenses, &id)?,
                    net,
                    position: NetPosition::from_net(net),
                    user_id: id,
                    name,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(Self {
            total_group_expenses: ledger::total_group_expenses(&expenses)?,
            expense_count: expenses.len(),
            members,
            active_user: active.map(|u| u.id),
            currency_symbol: settings.currency_symbol,
        })
    }

    /// The active user's line
    pub fn active_member(&self) -> Option<&MemberSummary> {
        let active = self.active_user.as_ref()?;
        self.members.iter().find(|m| &m.user_id == active)
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Group Summary\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "Total Group Expenses: {:>14}  ({} records)\n",
            self.money(self.total_group_expenses),
            self.expense_count
        ));

        if let Some(me) = self.active_member() {
            output.push_str(&format!(
                "Your Share:           {:>14}  ({})\n",
                self.money(me.share),
                me.name
            ));
            output.push_str(&format!(
                "Your Net Balance:     {:>14}  ({})\n",
                self.money(me.position.amount()),
                me.position.label()
            ));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>12} {:>12} {:>12}  {}\n",
            "Member", "Paid", "Share", "Net", "Status"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for member in &self.members {
            let marker = if Some(&member.user_id) == self.active_user.as_ref() {
                "*"
            } else {
                " "
            };
            output.push_str(&format!(
                "{}{:<19} {:>12} {:>12} {:>12}  {}\n",
                marker,
                member.name,
                self.money(member.paid),
                self.money(member.share),
                self.money(member.net),
                member.position.label()
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str("* = active user\n");

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());
        let plain = |m: Money| format!("{:.2}", m.amount().round_dp(2));

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["User ID", "Name", "Paid", "Share", "Income", "Net", "Status"])
            .map_err(export_err)?;

        for member in &self.members {
            csv.write_record([
                member.user_id.to_string(),
                member.name.clone(),
                plain(member.paid),
                plain(member.share),
                plain(member.income),
                plain(member.net),
                member.position.label().to_string(),
            ])
            .map_err(export_err)?;
        }

        csv.flush()
            .map_err(|e| LedgerError::Export(e.to_string()))
    }
}
