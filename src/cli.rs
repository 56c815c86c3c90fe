//! Text front ends driving a [`Registry`]: the interactive menu and the CSV
//! script runner. Both only parse input into [`Command`]s and print results.

use std::io::{BufRead, Read, Write};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::account::{AccountNumber, BRANCH_CODE};
use crate::client::NationalId;
use crate::engine::{self, Command};
use crate::registry::Registry;
use crate::transaction::TransactionKind;

const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

const MENU: &str = "
================ MENU ================
[1]\tDeposit
[2]\tWithdraw
[3]\tStatement
[4]\tNew account
[5]\tList accounts
[6]\tNew client
[7]\tList clients
[0]\tQuit
=> ";

pub fn parse_birth_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BIRTH_DATE_FORMAT)
        .with_context(|| format!("birth date {value:?} is not in dd-mm-yyyy format"))
}

pub fn parse_amount(value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).with_context(|| format!("{value:?} is not a number"))
}

enum Flow {
    Continue,
    Quit,
}

/// Menu loop over a line-based terminal. End of input quits.
pub struct Interactive<'a, R, W> {
    registry: &'a mut Registry,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Interactive<'a, R, W> {
    pub fn new(registry: &'a mut Registry, input: R, output: W) -> Self {
        Self {
            registry,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(option) = self.prompt(MENU)? else {
                break;
            };
            let flow = match option.as_str() {
                "1" => self.transact(TransactionKind::Deposit)?,
                "2" => self.transact(TransactionKind::Withdrawal)?,
                "3" => self.statement()?,
                "4" => self.open_account()?,
                "5" => self.run_command(Command::ListAccounts)?,
                "6" => self.register_client()?,
                "7" => self.run_command(Command::ListClients)?,
                "0" => Flow::Quit,
                _ => {
                    self.say("Invalid operation, please select the desired operation again.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).context("failed to read input")? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "\n{message}")?;
        Ok(())
    }

    fn run_command(&mut self, command: Command) -> Result<Flow> {
        match engine::execute(self.registry, command) {
            Ok(outcome) => self.say(&outcome.0)?,
            Err(err) => self.say(&format!("@@@ Operation failed! {err} @@@"))?,
        }
        Ok(Flow::Continue)
    }

    /// Asks for a national id and an account of that client, prompting for a
    /// choice when the client has several.
    fn select_account(&mut self) -> Result<Option<(NationalId, AccountNumber)>> {
        let Some(national_id) = self.prompt("Client national id (CPF): ")? else {
            return Ok(None);
        };
        let Some(client) = self.registry.find_client_by_national_id(&national_id) else {
            self.say("@@@ Client not found! @@@")?;
            return Ok(None);
        };
        let accounts = client.accounts().to_vec();

        let number = match accounts.as_slice() {
            [] => {
                self.say("@@@ Client has no registered accounts! @@@")?;
                return Ok(None);
            }
            [number] => *number,
            _ => {
                self.say("Client has several accounts:")?;
                for (index, number) in accounts.iter().enumerate() {
                    writeln!(
                        self.output,
                        "  [{}] Branch: {} | Account: {number}",
                        index + 1,
                        BRANCH_CODE
                    )?;
                }
                let label = format!("Account number (1 to {}): ", accounts.len());
                loop {
                    let Some(choice) = self.prompt(&label)? else {
                        return Ok(None);
                    };
                    match choice.parse::<usize>() {
                        Ok(index) if (1..=accounts.len()).contains(&index) => {
                            break accounts[index - 1];
                        }
                        Ok(_) => self.say("@@@ Invalid option! @@@")?,
                        Err(_) => self.say("@@@ Invalid input. Enter only the number. @@@")?,
                    }
                }
            }
        };
        Ok(Some((NationalId::from(national_id), number)))
    }

    fn transact(&mut self, kind: TransactionKind) -> Result<Flow> {
        let Some((national_id, number)) = self.select_account()? else {
            return Ok(Flow::Continue);
        };
        let label = match kind {
            TransactionKind::Deposit => "Deposit amount: ",
            TransactionKind::Withdrawal => "Withdrawal amount: ",
        };
        let Some(value) = self.prompt(label)? else {
            return Ok(Flow::Quit);
        };
        let Ok(amount) = parse_amount(&value) else {
            self.say("@@@ Invalid value! Enter a number. @@@")?;
            return Ok(Flow::Continue);
        };

        self.run_command(Command::Transact {
            kind,
            national_id,
            account: Some(number),
            amount,
        })
    }

    fn statement(&mut self) -> Result<Flow> {
        let Some((national_id, number)) = self.select_account()? else {
            return Ok(Flow::Continue);
        };
        self.run_command(Command::Statement {
            national_id,
            account: Some(number),
        })
    }

    fn open_account(&mut self) -> Result<Flow> {
        let Some(national_id) = self.prompt("Client national id (CPF): ")? else {
            return Ok(Flow::Quit);
        };
        self.run_command(Command::OpenAccount {
            national_id: NationalId::from(national_id),
        })
    }

    fn register_client(&mut self) -> Result<Flow> {
        let Some(national_id) = self.prompt("National id (CPF, numbers only): ")? else {
            return Ok(Flow::Quit);
        };
        if self
            .registry
            .find_client_by_national_id(&national_id)
            .is_some()
        {
            self.say("@@@ A client with this national id already exists! @@@")?;
            return Ok(Flow::Continue);
        }
        let Some(name) = self.prompt("Full name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(birth_date) = self.prompt("Birth date (dd-mm-yyyy): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(address) = self.prompt("Address (street, number - district - city/state): ")?
        else {
            return Ok(Flow::Quit);
        };
        let birth_date = match parse_birth_date(&birth_date) {
            Ok(date) => date,
            Err(err) => {
                warn!("{err:#}");
                self.say("@@@ Invalid birth date format! Registration cancelled. @@@")?;
                return Ok(Flow::Continue);
            }
        };

        self.run_command(Command::RegisterClient {
            name,
            birth_date,
            national_id: NationalId::from(national_id),
            address,
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ScriptCommand {
    NewClient,
    NewAccount,
    Deposit,
    Withdraw,
    Statement,
    ListAccounts,
    ListClients,
}

/// One line of a script file.
#[derive(Debug, Deserialize)]
struct ScriptRow {
    command: ScriptCommand,
    cpf: Option<NationalId>,
    account: Option<AccountNumber>,
    amount: Option<Decimal>,
    name: Option<String>,
    birth_date: Option<String>,
    address: Option<String>,
}

fn required<T>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| anyhow!("missing {name}"))
}

impl TryFrom<ScriptRow> for Command {
    type Error = anyhow::Error;

    fn try_from(row: ScriptRow) -> Result<Self> {
        let account = row.account;
        let command = match row.command {
            ScriptCommand::NewClient => Command::RegisterClient {
                birth_date: parse_birth_date(&required(row.birth_date, "birth_date")?)?,
                national_id: required(row.cpf, "cpf")?,
                name: required(row.name, "name")?,
                address: row.address.unwrap_or_default(),
            },
            ScriptCommand::NewAccount => Command::OpenAccount {
                national_id: required(row.cpf, "cpf")?,
            },
            ScriptCommand::Deposit | ScriptCommand::Withdraw => Command::Transact {
                kind: match row.command {
                    ScriptCommand::Deposit => TransactionKind::Deposit,
                    _ => TransactionKind::Withdrawal,
                },
                national_id: required(row.cpf, "cpf")?,
                account,
                amount: row.amount.ok_or_else(|| anyhow!("missing amount"))?,
            },
            ScriptCommand::Statement => Command::Statement {
                national_id: required(row.cpf, "cpf")?,
                account,
            },
            ScriptCommand::ListAccounts => Command::ListAccounts,
            ScriptCommand::ListClients => Command::ListClients,
        };
        Ok(command)
    }
}

/// Executes every row of a headed CSV script in order, printing each outcome.
/// Rows that cannot be read are logged and skipped.
pub fn run_script<R: Read, W: Write>(
    registry: &mut Registry,
    script: R,
    mut output: W,
) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(script);

    let mut executed = 0usize;
    for (index, row) in reader.deserialize::<ScriptRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let command = match row.map_err(anyhow::Error::from).and_then(Command::try_from) {
            Ok(command) => command,
            Err(err) => {
                warn!("Skipping script line {line}: {err:#}");
                continue;
            }
        };
        match engine::execute(registry, command) {
            Ok(outcome) => writeln!(output, "{}", outcome.0)?,
            Err(err) => writeln!(output, "@@@ Operation failed! {err} @@@")?,
        }
        executed += 1;
    }
    info!("Executed {executed} script commands");
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn interact(registry: &mut Registry, input: &str) -> String {
        let mut output = Vec::new();
        Interactive::new(registry, Cursor::new(input), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn script(registry: &mut Registry, script: &str) -> String {
        let mut output = Vec::new();
        run_script(registry, script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            NaiveDate::from_ymd_opt(1990, 2, 1).unwrap(),
            parse_birth_date("01-02-1990").unwrap()
        );
        assert!(parse_birth_date("1990-02-01").is_err());
        assert!(parse_birth_date("31-02-1990").is_err());
    }

    #[test]
    fn test_interactive_session() {
        let mut registry = Registry::default();
        let output = interact(
            &mut registry,
            "6\n111\nAna\n01-02-1990\nRua A, 1\n4\n111\n1\n111\n100\n2\n111\n30\n3\n111\n0\n",
        );

        assert!(output.contains("Client registered successfully!"));
        assert!(output.contains("Account 1 opened successfully!"));
        assert!(output.contains("Deposit completed successfully!"));
        assert!(output.contains("Withdrawal completed successfully!"));
        assert!(output.contains("Balance:\t\t$ 70.00"));
        assert_eq!(
            Decimal::new(70, 0),
            registry.account(AccountNumber::new(1)).unwrap().balance()
        );
    }

    #[test]
    fn test_interactive_failures_keep_looping() {
        let mut registry = Registry::default();
        let output = interact(
            &mut registry,
            concat!(
                "9\n1\n111\n",
                "6\n111\nAna\n1990/02/01\nRua A\n",
                "6\n111\nAna\n01-02-1990\nRua A\n",
                "1\n111\n6\n111\n",
            ),
        );

        assert!(output.contains("Invalid operation"));
        assert!(output.contains("@@@ Client not found! @@@"));
        assert!(output.contains("Registration cancelled."));
        assert!(output.contains("Client registered successfully!"));
        assert!(output.contains("@@@ Client has no registered accounts! @@@"));
        assert!(output.contains("already exists"));
        assert_eq!(1, registry.clients().count());
    }

    #[test]
    fn test_interactive_account_selection_and_bad_amount() {
        let mut registry = Registry::default();
        registry
            .register_client(
                "Ana",
                NaiveDate::from_ymd_opt(1990, 2, 1).unwrap(),
                NationalId::from("111"),
                "Rua A",
            )
            .unwrap();
        registry.open_account("111").unwrap();
        registry.open_account("111").unwrap();

        let output = interact(&mut registry, "1\n111\nx\n5\n2\n50\n1\n111\n1\nabc\n");

        assert!(output.contains("[2] Branch: 0001 | Account: 2"));
        assert!(output.contains("Enter only the number."));
        assert!(output.contains("@@@ Invalid option! @@@"));
        assert!(output.contains("@@@ Invalid value! Enter a number. @@@"));
        assert_eq!(
            Decimal::new(50, 0),
            registry.account(AccountNumber::new(2)).unwrap().balance()
        );
        assert_eq!(
            Decimal::ZERO,
            registry.account(AccountNumber::new(1)).unwrap().balance()
        );
    }

    #[test]
    fn test_interactive_reports_rule_violations() {
        let mut registry = Registry::default();
        let output = interact(
            &mut registry,
            "6\n111\nAna\n01-02-1990\nRua A\n4\n111\n1\n111\n1100\n2\n111\n600\n",
        );

        assert!(
            output.contains("@@@ Operation failed! The withdrawal amount exceeds the limit. @@@")
        );
    }

    #[test]
    fn test_script_runs_rows_in_order() {
        let mut registry = Registry::default();
        let output = script(
            &mut registry,
            "command,cpf,account,amount,name,birth_date,address
new-client,111,,,Ana,01-02-1990,Rua A
new-account,111,,,,,
deposit,111,,1000,,,
withdraw,111,1,600,,,
withdraw,111,1,100.50,,,
list-accounts,,,,,,
",
        );

        assert!(output.contains("Client registered successfully!"));
        assert!(output.contains("Account 1 opened successfully!"));
        assert!(output.contains("The withdrawal amount exceeds the limit."));
        assert!(output.contains("Holder:\t\tAna"));
        assert_eq!(
            Decimal::from_str("899.50").unwrap(),
            registry.account(AccountNumber::new(1)).unwrap().balance()
        );
    }

    #[test]
    fn test_script_skips_malformed_rows() {
        let mut registry = Registry::default();
        let output = script(
            &mut registry,
            "command,cpf,account,amount,name,birth_date,address
transfer,111,,,,,
new-client,111,,,Ana,1990-02-01,Rua A
deposit,111,,,,,
new-client,222,,,Bia,03-04-1995,Rua B
",
        );

        assert_eq!(1, registry.clients().count());
        assert_eq!(1, output.lines().count());
        assert!(registry.find_client_by_national_id("222").is_some());
    }
}
