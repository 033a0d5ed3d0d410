use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::scoring::{
    ActivityEntry, ClientId, EntryId, InterviewLog, RoleId, RoleRecord, TeamId, UserId, YearMonth,
};

use super::domain::{Client, MonthlyReminder, PendingStatusReview, Placement, Team, User};
use super::repository::{EntryFilter, RepositoryError, RoleFilter, TrackerRepository};

#[derive(Debug, Default)]
struct TrackerState {
    users: BTreeMap<UserId, User>,
    clients: BTreeMap<ClientId, Client>,
    teams: BTreeMap<TeamId, Team>,
    team_members: BTreeSet<(UserId, TeamId)>,
    client_members: BTreeSet<(UserId, ClientId)>,
    placements: BTreeSet<Placement>,
    roles: BTreeMap<RoleId, RoleRecord>,
    interviews: Vec<InterviewLog>,
    entries: BTreeMap<EntryId, ActivityEntry>,
    reviews: Vec<PendingStatusReview>,
    reminders: BTreeMap<(UserId, YearMonth), bool>,
    role_sequence: i64,
    entry_sequence: i64,
}

/// Mutex-guarded store used by the service binary, the demo and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTrackerRepository {
    state: Arc<Mutex<TrackerState>>,
}

impl InMemoryTrackerRepository {
    fn state(&self) -> Result<MutexGuard<'_, TrackerState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("tracker state poisoned".to_string()))
    }

    pub fn insert_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let email_taken = state
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email));
        if state.users.contains_key(&user.id) || email_taken {
            return Err(RepositoryError::Conflict);
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_client(&self, client: Client) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.clients.contains_key(&client.id) {
            return Err(RepositoryError::Conflict);
        }
        state.clients.insert(client.id, client);
        Ok(())
    }

    pub fn insert_team(&self, team: Team) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.teams.contains_key(&team.id) {
            return Err(RepositoryError::Conflict);
        }
        state.teams.insert(team.id, team);
        Ok(())
    }
}

impl TrackerRepository for InMemoryTrackerRepository {
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.state()?.users.values().cloned().collect())
    }

    fn clients(&self) -> Result<Vec<Client>, RepositoryError> {
        Ok(self.state()?.clients.values().cloned().collect())
    }

    fn teams(&self) -> Result<Vec<Team>, RepositoryError> {
        Ok(self.state()?.teams.values().cloned().collect())
    }

    fn user_teams(&self, user: UserId) -> Result<Vec<Team>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .team_members
            .iter()
            .filter(|(member, _)| *member == user)
            .filter_map(|(_, team)| state.teams.get(team).cloned())
            .collect())
    }

    fn user_clients(&self, user: UserId) -> Result<Vec<Client>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .client_members
            .iter()
            .filter(|(member, _)| *member == user)
            .filter_map(|(_, client)| state.clients.get(client).cloned())
            .collect())
    }

    fn team_members(&self, team: TeamId) -> Result<Vec<User>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .team_members
            .iter()
            .filter(|(_, member_team)| *member_team == team)
            .filter_map(|(user, _)| state.users.get(user).cloned())
            .collect())
    }

    fn assign_team(&self, user: UserId, team: TeamId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.users.contains_key(&user) || !state.teams.contains_key(&team) {
            return Err(RepositoryError::NotFound);
        }
        if !state.team_members.insert((user, team)) {
            return Err(RepositoryError::Conflict);
        }
        Ok(())
    }

    fn unassign_team(&self, user: UserId, team: TeamId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.team_members.remove(&(user, team)) {
            return Err(RepositoryError::NotFound);
        }
        state
            .placements
            .retain(|placement| !(placement.recruiter_id == user && placement.team_id == team));
        Ok(())
    }

    fn assign_client(&self, user: UserId, client: ClientId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.users.contains_key(&user) || !state.clients.contains_key(&client) {
            return Err(RepositoryError::NotFound);
        }
        if !state.client_members.insert((user, client)) {
            return Err(RepositoryError::Conflict);
        }
        Ok(())
    }

    fn unassign_client(&self, user: UserId, client: ClientId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.client_members.remove(&(user, client)) {
            return Err(RepositoryError::NotFound);
        }
        state.placements.retain(|placement| {
            !(placement.recruiter_id == user && placement.client_id == client)
        });
        Ok(())
    }

    fn placements(&self, recruiter: UserId) -> Result<Vec<Placement>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .placements
            .iter()
            .filter(|placement| placement.recruiter_id == recruiter)
            .copied()
            .collect())
    }

    fn add_placement(&self, placement: Placement) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let known = state.users.contains_key(&placement.recruiter_id)
            && state.clients.contains_key(&placement.client_id)
            && state.teams.contains_key(&placement.team_id);
        if !known {
            return Err(RepositoryError::NotFound);
        }
        if !state.placements.insert(placement) {
            return Err(RepositoryError::Conflict);
        }
        state
            .team_members
            .insert((placement.recruiter_id, placement.team_id));
        state
            .client_members
            .insert((placement.recruiter_id, placement.client_id));
        Ok(())
    }

    fn roles(&self, filter: &RoleFilter) -> Result<Vec<RoleRecord>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .roles
            .values()
            .filter(|role| filter.matches(role))
            .cloned()
            .collect())
    }

    fn role(&self, id: RoleId) -> Result<Option<RoleRecord>, RepositoryError> {
        Ok(self.state()?.roles.get(&id).cloned())
    }

    fn insert_role(&self, mut role: RoleRecord) -> Result<RoleRecord, RepositoryError> {
        let mut state = self.state()?;
        state.role_sequence += 1;
        role.id = RoleId(state.role_sequence);
        role.role_code = format!("ROLE-{:04}", state.role_sequence);
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    fn update_role(&self, role: RoleRecord) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        match state.roles.get_mut(&role.id) {
            Some(slot) => {
                *slot = role;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete_role(&self, id: RoleId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.roles.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        state.interviews.retain(|log| log.role_id != id);
        Ok(())
    }

    fn interview_logs(&self, roles: &[RoleId]) -> Result<Vec<InterviewLog>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .interviews
            .iter()
            .filter(|log| roles.contains(&log.role_id))
            .cloned()
            .collect())
    }

    fn insert_interview_log(&self, log: InterviewLog) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.roles.contains_key(&log.role_id) {
            return Err(RepositoryError::NotFound);
        }
        state.interviews.push(log);
        Ok(())
    }

    fn entries(&self, filter: &EntryFilter) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .entries
            .values()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    fn insert_entry(&self, mut entry: ActivityEntry) -> Result<ActivityEntry, RepositoryError> {
        let mut state = self.state()?;
        state.entry_sequence += 1;
        entry.id = EntryId(state.entry_sequence);
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn insert_pending_review(&self, review: PendingStatusReview) -> Result<(), RepositoryError> {
        self.state()?.reviews.push(review);
        Ok(())
    }

    fn pending_reviews(&self, role: RoleId) -> Result<Vec<PendingStatusReview>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .reviews
            .iter()
            .filter(|review| review.role_id == role)
            .cloned()
            .collect())
    }

    fn reminder(
        &self,
        user: UserId,
        month: YearMonth,
    ) -> Result<Option<MonthlyReminder>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .reminders
            .get(&(user, month))
            .map(|confirmed| MonthlyReminder {
                user_id: user,
                month,
                confirmed: *confirmed,
            }))
    }

    fn confirm_reminder(
        &self,
        user: UserId,
        month: YearMonth,
    ) -> Result<MonthlyReminder, RepositoryError> {
        self.state()?.reminders.insert((user, month), true);
        Ok(MonthlyReminder {
            user_id: user,
            month,
            confirmed: true,
        })
    }
}
