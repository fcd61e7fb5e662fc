pub const PROBLEM_LIST_OPERATION: &str = "problemsetQuestionList";
pub const PROBLEM_LIST: &str = r#"query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    total: totalNum
    questions: data {
      questionId
      questionFrontendId
      title
      titleSlug
      difficulty
      paidOnly: isPaidOnly
      acRate
      likes
      dislikes
      categoryTitle
      hasSolution
      hasVideoSolution
      topicTags { name slug }
    }
  }
}"#;

pub const QUESTION_DETAIL_OPERATION: &str = "questionData";
pub const QUESTION_DETAIL: &str = r#"query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    likes
    dislikes
    stats
    similarQuestions
    categoryTitle
    hints
    topicTags { name slug }
    companyTags { name }
    difficulty
    isPaidOnly
    solution { canSeeDetail content }
    hasSolution
    hasVideoSolution
  }
}"#;

pub const DAILY_CHALLENGE_OPERATION: &str = "questionOfToday";
pub const DAILY_CHALLENGE: &str = r#"query questionOfToday {
  activeDailyCodingChallengeQuestion {
    date
    link
    question {
      questionId
      questionFrontendId
      title
      titleSlug
      difficulty
      acRate
      topicTags { name slug }
      content
    }
  }
}"#;

pub const USER_PROFILE_OPERATION: &str = "userPublicProfile";
pub const USER_PROFILE: &str = r#"query userPublicProfile($username: String!) {
  matchedUser(username: $username) {
    username
    githubUrl
    twitterUrl
    linkedinUrl
    profile {
      userAvatar
      realName
      websites
      countryName
      company
      jobTitle
      skillTags
      school
      aboutMe
      reputation
      ranking
      solutionCount
      postViewCount
      certificationLevel
    }
    submitStats {
      acSubmissionNum { difficulty count submissions }
      totalSubmissionNum { difficulty count submissions }
    }
    contestBadge { name expired hoverText icon }
  }
}"#;

pub const USER_CONTESTS_OPERATION: &str = "userContestRankingInfo";
pub const USER_CONTESTS: &str = r#"query userContestRankingInfo($username: String!) {
  userContestRanking(username: $username) {
    attendedContestsCount
    rating
    globalRanking
    totalParticipants
    topPercentage
    badge { name }
  }
  userContestRankingHistory(username: $username) {
    attended
    trendDirection
    problemsSolved
    totalProblems
    finishTimeInSeconds
    rating
    ranking
    contest { title startTime }
  }
}"#;

pub const USER_SUBMISSIONS_OPERATION: &str = "recentSubmissions";
pub const USER_SUBMISSIONS: &str = r#"query recentSubmissions($username: String!, $limit: Int) {
  recentSubmissionList(username: $username, limit: $limit) {
    id
    title
    titleSlug
    timestamp
    status
    statusDisplay
    lang
    langName
    runtime
    memory
    url
    isPending
  }
}"#;

pub const USER_CALENDAR_OPERATION: &str = "userProfileCalendar";
pub const USER_CALENDAR: &str = r#"query userProfileCalendar($username: String!, $year: Int) {
  matchedUser(username: $username) {
    userCalendar(year: $year) {
      activeYears
      streak
      totalActiveDays
      dccBadges { timestamp badge { name icon } }
      submissionCalendar
    }
  }
}"#;

pub const USER_SKILLS_OPERATION: &str = "skillStats";
pub const USER_SKILLS: &str = r#"query skillStats($username: String!) {
  matchedUser(username: $username) {
    tagProblemCounts {
      advanced { tagName tagSlug problemsSolved }
      intermediate { tagName tagSlug problemsSolved }
      fundamental { tagName tagSlug problemsSolved }
    }
  }
}"#;

pub const USER_BADGES_OPERATION: &str = "userBadges";
pub const USER_BADGES: &str = r#"query userBadges($username: String!) {
  matchedUser(username: $username) {
    badges { id name shortName displayName icon hoverText creationDate category }
    upcomingBadges { name icon progress }
  }
}"#;
