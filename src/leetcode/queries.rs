pub const RECENT_SUBMISSIONS: &str = r#"
query recentSubmissions($username: String!, $limit: Int) {
  recentSubmissionList(username: $username, limit: $limit) {
    title
    titleSlug
    timestamp
    statusDisplay
    lang
  }
}"#;

pub const USER_PROFILE: &str = r#"
query getUserProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile {
      realName
      userAvatar
      ranking
      reputation
      aboutMe
      countryName
      company
      school
      skillTags
    }
    submitStats {
      acSubmissionNum { difficulty count submissions }
      totalSubmissionNum { difficulty count submissions }
    }
    badges { id displayName icon creationDate }
    contributions { points questionCount testcaseCount }
  }
}"#;

pub const CONTEST_RANKING: &str = r#"
query userContestRankingInfo($username: String!) {
  userContestRanking(username: $username) {
    attendedContestsCount
    rating
    globalRanking
    topPercentage
  }
}"#;

pub const PROBLEM: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionFrontendId
    title
    titleSlug
    difficulty
    topicTags { name slug }
  }
}"#;

pub const USER_STATUS: &str = r#"
query globalData {
  userStatus {
    isSignedIn
    username
  }
}"#;

pub const SUBMISSION_LIST: &str = r#"
query submissionList($offset: Int!, $limit: Int!) {
  submissionList(offset: $offset, limit: $limit) {
    hasNext
    submissions {
      id
      title
      titleSlug
      timestamp
      statusDisplay
      lang
      runtime
      memory
    }
  }
}"#;

pub const SUBMISSION_DETAIL: &str = r#"
query submissionDetails($submissionId: Int!) {
  submissionDetails(submissionId: $submissionId) {
    runtimeDisplay
    memoryDisplay
    code
    timestamp
    statusCode
    lang { name verboseName }
    question { title titleSlug }
  }
}"#;
